use std::time::Duration;

use crate::Result;
use crate::model::{Environment, TestRun, TestSuite};
use crate::store::{Action, Store};

/// 后端 REST 接口的薄封装
///
/// 每个端点一个函数，没有重试/退避/熔断；错误以 SET_ERROR 的形式
/// 作为普通数据进入 store，由 load_remote 负责
pub struct ApiClient {
    base: url::Url,
    inner: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base: url::Url::parse(base_url)?,
            inner: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub async fn fetch_test_suites(&self) -> Result<Vec<TestSuite>> {
        let response = self
            .inner
            .get(self.endpoint("test-suites"))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    pub async fn create_test_suite(&self, suite: &TestSuite) -> Result<TestSuite> {
        let response = self
            .inner
            .post(self.endpoint("test-suites"))
            .json(suite)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    pub async fn update_test_suite(&self, suite: &TestSuite) -> Result<TestSuite> {
        let response = self
            .inner
            .put(self.endpoint(&format!("test-suites/{}", suite.id)))
            .json(suite)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    pub async fn delete_test_suite(&self, id: &str) -> Result<()> {
        self.inner
            .delete(self.endpoint(&format!("test-suites/{}", id)))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    pub async fn fetch_environments(&self) -> Result<Vec<Environment>> {
        let response = self
            .inner
            .get(self.endpoint("environments"))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    pub async fn create_environment(&self, environment: &Environment) -> Result<Environment> {
        let response = self
            .inner
            .post(self.endpoint("environments"))
            .json(environment)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    pub async fn update_environment(&self, environment: &Environment) -> Result<Environment> {
        let response = self
            .inner
            .put(self.endpoint(&format!("environments/{}", environment.id)))
            .json(environment)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    pub async fn delete_environment(&self, id: &str) -> Result<()> {
        self.inner
            .delete(self.endpoint(&format!("environments/{}", id)))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    pub async fn create_test_run(&self, run: &TestRun) -> Result<TestRun> {
        let response = self
            .inner
            .post(self.endpoint("test-runs"))
            .json(run)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    pub async fn fetch_test_run(&self, id: &str) -> Result<TestRun> {
        let response = self
            .inner
            .get(self.endpoint(&format!("test-runs/{}", id)))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}

/// 标准加载流程：SET_LOADING -> 拉取 -> SET_TEST_SUITES/SET_ENVIRONMENTS
/// 或 SET_ERROR -> SET_LOADING(false)
pub async fn load_remote(store: &Store, api: &ApiClient) -> Result<()> {
    store.dispatch(Action::SetLoading(true));

    let loaded = async {
        let suites = api.fetch_test_suites().await?;
        let environments = api.fetch_environments().await?;
        Ok::<_, crate::RusuiteError>((suites, environments))
    }
    .await;

    let outcome = match loaded {
        Ok((suites, environments)) => {
            store.dispatch(Action::SetTestSuites(suites));
            if !environments.is_empty() {
                store.dispatch(Action::SetEnvironments(environments));
            }
            store.dispatch(Action::SetError(None));
            Ok(())
        }
        Err(e) => {
            store.dispatch(Action::SetError(Some(e.to_string())));
            Err(e)
        }
    };

    store.dispatch(Action::SetLoading(false));
    outcome
}
