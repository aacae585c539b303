use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;
use inquire::Select;

use rusuite::api::{self, ApiClient};
use rusuite::config::ConfigLoader;
use rusuite::model::{IdGen, TestSuite};
use rusuite::runner::reporter::{environments_table, suites_table};
use rusuite::runner::{RunReporter, RunnerOptions, SuiteRunner, apply_run_to_suite};
use rusuite::storage::{PersistedState, SnapshotStorage};
use rusuite::store::{Action, AppState, Store};
use rusuite::{Result, RusuiteError};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 运行测试套件（省略名称时交互选择）
    Run {
        /// 套件 ID 或名称
        suite: Option<String>,

        /// 使用的环境 ID（默认当前选中环境）
        #[arg(long)]
        env: Option<String>,

        /// 首个失败后跳过剩余测试
        #[arg(long)]
        fail_fast: bool,

        #[arg(short, long)]
        verbose: bool,
    },

    /// 列出所有测试套件
    List,

    /// 列出所有环境
    Envs,

    /// 选择当前环境
    Select {
        /// 环境 ID
        environment: String,
    },

    /// 从 JSON 文件导入测试套件
    Import { path: String },

    /// 从远端 API 拉取套件与环境
    Sync {
        /// 后端 base URL
        #[arg(long)]
        api: String,
    },
}

pub struct App {
    store: Arc<Store>,
    storage: SnapshotStorage,
    ids: IdGen,
}

impl App {
    /// 构建 store 并灌入持久化状态和配置文件中的环境
    pub fn bootstrap() -> Result<Self> {
        let store = Arc::new(Store::new(AppState::seeded()));
        let storage = SnapshotStorage::new();

        match storage.load() {
            Ok(Some(persisted)) => persisted.restore(&store),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("failed to load persisted state: {}", e);
                store.dispatch(Action::SetError(Some(e.to_string())));
            }
        }

        if let Some(config) = ConfigLoader::find_and_load() {
            let environments = config.into_environments();
            if !environments.is_empty() {
                store.dispatch(Action::SetEnvironments(environments));

                // 选中的环境在新列表中失效时，回退到第一个 active 的
                let snapshot = store.snapshot();
                if snapshot.current_environment().is_none() {
                    let fallback = snapshot
                        .environments
                        .iter()
                        .find(|e| e.active)
                        .or_else(|| snapshot.environments.first())
                        .map(|e| e.id.clone());
                    store.dispatch(Action::SetSelectedEnvironment(fallback));
                }
            }
        }

        Ok(Self {
            store,
            storage,
            ids: IdGen::uuid(),
        })
    }

    pub async fn run_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Run {
                suite,
                env,
                fail_fast,
                verbose,
            } => self.run_suite(suite, env, fail_fast, verbose).await,
            Commands::List => {
                let snapshot = self.store.snapshot();
                println!("{}", suites_table(&snapshot.test_suites));
                Ok(())
            }
            Commands::Envs => {
                let snapshot = self.store.snapshot();
                println!(
                    "{}",
                    environments_table(
                        &snapshot.environments,
                        snapshot.selected_environment.as_deref()
                    )
                );
                Ok(())
            }
            Commands::Select { environment } => self.select_environment(environment),
            Commands::Import { path } => self.import_suites(&path),
            Commands::Sync { api } => self.sync(&api).await,
        }
    }

    async fn run_suite(
        &self,
        suite: Option<String>,
        env: Option<String>,
        fail_fast: bool,
        verbose: bool,
    ) -> Result<()> {
        let snapshot = self.store.snapshot();
        let suite = self.pick_suite(&snapshot.test_suites, suite)?;

        let environment = match env {
            Some(id) => Some(
                snapshot
                    .environment(&id)
                    .ok_or(RusuiteError::EnvironmentNotFound(id))?
                    .clone(),
            ),
            None => snapshot.current_environment().cloned(),
        };

        let reporter = RunReporter::new(verbose);
        reporter.print_header(&suite, environment.as_ref());

        let runner = SuiteRunner::with_options(RunnerOptions { fail_fast });
        let run = runner.run(&self.store, &suite, environment.as_ref()).await?;
        reporter.print_run(&suite, &run);

        // 把结果写回套件（状态/last_run/耗时），再落盘
        let updated = apply_run_to_suite(&suite, &run);
        self.store.dispatch(Action::UpdateTestSuite(updated));
        self.persist()?;

        if run.summary.failed > 0 {
            std::process::exit(1);
        }
        Ok(())
    }

    /// 按 ID 或名称查找；未指定时交互选择
    fn pick_suite(&self, suites: &[TestSuite], wanted: Option<String>) -> Result<TestSuite> {
        if let Some(wanted) = wanted {
            return suites
                .iter()
                .find(|s| s.id == wanted || s.name.eq_ignore_ascii_case(&wanted))
                .cloned()
                .ok_or(RusuiteError::SuiteNotFound(wanted));
        }

        if suites.is_empty() {
            return Err(RusuiteError::Other(
                "No test suites available. Import one with `rusuite import`".to_string(),
            ));
        }

        #[derive(Clone)]
        struct SuiteOption {
            index: usize,
            display: String,
        }

        impl std::fmt::Display for SuiteOption {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.display)
            }
        }

        let options: Vec<SuiteOption> = suites
            .iter()
            .enumerate()
            .map(|(index, s)| SuiteOption {
                index,
                display: format!("{} ({} tests)", s.name, s.tests.len()),
            })
            .collect();

        let chosen = Select::new("Select a suite to run:", options)
            .with_page_size(15)
            .prompt()
            .map_err(|e| RusuiteError::Other(format!("Interaction canceled or failed: {}", e)))?;

        Ok(suites[chosen.index].clone())
    }

    fn select_environment(&self, environment: String) -> Result<()> {
        let snapshot = self.store.snapshot();
        if snapshot.environment(&environment).is_none() {
            return Err(RusuiteError::EnvironmentNotFound(environment));
        }

        self.store
            .dispatch(Action::SetSelectedEnvironment(Some(environment.clone())));
        self.persist()?;
        println!("Selected environment: {}", environment.cyan());
        Ok(())
    }

    fn import_suites(&self, path: &str) -> Result<()> {
        let content = std::fs::read_to_string(path)?;

        // 单个套件或套件数组都接受
        let mut suites: Vec<TestSuite> = match serde_json::from_str::<Vec<TestSuite>>(&content) {
            Ok(suites) => suites,
            Err(_) => vec![serde_json::from_str::<TestSuite>(&content)?],
        };

        let snapshot = self.store.snapshot();
        let mut imported = 0;
        for suite in &mut suites {
            if suite.id.is_empty() {
                suite.id = self.ids.next();
            }

            if snapshot.suite(&suite.id).is_some() {
                suite.touch();
                self.store.dispatch(Action::UpdateTestSuite(suite.clone()));
            } else {
                self.store.dispatch(Action::AddTestSuite(suite.clone()));
            }
            imported += 1;
        }

        self.persist()?;
        println!("Imported {} suite(s) from {}", imported, path.bold());
        Ok(())
    }

    async fn sync(&self, base_url: &str) -> Result<()> {
        let client = ApiClient::new(base_url)?;

        if let Err(e) = api::load_remote(&self.store, &client).await {
            println!("{}: {}", "Sync failed".red().bold(), e);
            return Err(e);
        }

        self.persist()?;
        let snapshot = self.store.snapshot();
        println!(
            "Synced {} suite(s), {} environment(s) from {}",
            snapshot.test_suites.len(),
            snapshot.environments.len(),
            base_url.bold()
        );
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        let state = PersistedState::from_snapshot(&self.store.snapshot());
        self.storage.save(&state)
    }
}
