use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, Table};

use crate::model::{Environment, ResultStatus, TestRun, TestSuite};

pub struct RunReporter {
    verbose: bool,
}

impl RunReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// 打印执行开始
    pub fn print_header(&self, suite: &TestSuite, environment: Option<&Environment>) {
        let env_part = match environment {
            Some(env) => format!(" against {}", env.name.cyan()),
            None => String::new(),
        };
        println!(
            "\nRunning {} ({} tests){}...\n",
            suite.name.bold(),
            suite.tests.len(),
            env_part
        );
    }

    /// 打印整次执行的逐条结果
    pub fn print_run(&self, suite: &TestSuite, run: &TestRun) {
        for result in &run.results {
            let name = suite
                .test(&result.test_id)
                .map(|t| t.name.as_str())
                .unwrap_or(result.test_id.as_str());

            match result.status {
                ResultStatus::Skipped => {
                    println!(" {} {} {}", "⊘".dimmed(), name, "(skipped)".dimmed());
                    continue;
                }
                ResultStatus::Passed => {
                    println!(
                        " {} {} ({}ms)",
                        "✓".green(),
                        name,
                        result.duration_ms
                    );
                }
                ResultStatus::Failed => {
                    println!(
                        " {} {} ({}ms)",
                        "✗".red(),
                        name,
                        result.duration_ms
                    );
                    if let Some(error) = &result.error {
                        println!("   {}: {}", "Error".red().bold(), error);
                    }
                }
            }

            // 断言明细：失败时总是显示，verbose 时全部显示
            if !result.assertions.is_empty()
                && (self.verbose || result.status == ResultStatus::Failed)
            {
                for assertion in &result.assertions {
                    if assertion.is_passed() {
                        println!("     {} {}", "✓".green(), assertion.kind.as_str());
                    } else {
                        println!(
                            "     {} {} expected {} got {}",
                            "✗".red(),
                            assertion.kind.as_str(),
                            assertion.expected,
                            assertion
                                .actual
                                .as_ref()
                                .map(|v| v.to_string())
                                .unwrap_or_else(|| "nothing".to_string())
                        );
                    }
                }
            }

            if self.verbose {
                if let Some(response) = &result.response {
                    println!("   HTTP {} ({}ms)", response.status, response.duration_ms);
                    if !response.body.is_empty() && response.body.len() < 400 {
                        for line in pretty_body(&response.body).lines() {
                            println!("   {}", line.dimmed());
                        }
                    } else if !response.body.is_empty() {
                        println!("   Body: {} bytes", response.body.len());
                    }
                }
            }
        }

        self.print_summary(run);
    }

    /// 打印执行摘要
    pub fn print_summary(&self, run: &TestRun) {
        let summary = &run.summary;
        println!("\n{}", "━".repeat(50));
        println!("{}", "Summary".bold());
        println!("{}", "━".repeat(50));

        if summary.skipped > 0 {
            println!(
                "  {}: {} passed, {} failed, {} skipped, {} total",
                "Tests".bold(),
                summary.passed.to_string().green(),
                summary.failed.to_string().red(),
                summary.skipped.to_string().dimmed(),
                summary.total
            );
        } else if summary.failed == 0 {
            println!(
                "  {}: {} passed, {} total",
                "Tests".bold(),
                summary.passed.to_string().green(),
                summary.total
            );
        } else {
            println!(
                "  {}: {} passed, {} failed, {} total",
                "Tests".bold(),
                summary.passed.to_string().green(),
                summary.failed.to_string().red(),
                summary.total
            );
        }

        if let Some(end_time) = run.end_time {
            let elapsed = end_time - run.start_time;
            println!(
                "  {}: {:.3}s",
                "Duration".bold(),
                elapsed.num_milliseconds() as f64 / 1000.0
            );
        }
        println!();
    }
}

impl Default for RunReporter {
    fn default() -> Self {
        Self::new(false)
    }
}

/// 套件一览表
pub fn suites_table(suites: &[TestSuite]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["ID", "Name", "Tests", "Status", "Updated"]);

    for suite in suites {
        let status_color = match suite.status {
            crate::model::SuiteStatus::Active => Color::Green,
            crate::model::SuiteStatus::Inactive => Color::DarkGrey,
        };

        table.add_row(vec![
            Cell::new(short_id(&suite.id)),
            Cell::new(&suite.name),
            Cell::new(suite.tests.len()),
            Cell::new(format!("{:?}", suite.status).to_lowercase()).fg(status_color),
            Cell::new(suite.updated_at.format("%Y-%m-%d %H:%M:%S")),
        ]);
    }
    table
}

/// 环境一览表
pub fn environments_table(environments: &[Environment], selected: Option<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["ID", "Name", "Base URL", "Active", "Selected"]);

    for env in environments {
        let selected_mark = if selected == Some(env.id.as_str()) {
            "*"
        } else {
            ""
        };
        table.add_row(vec![
            Cell::new(&env.id),
            Cell::new(&env.name),
            Cell::new(&env.base_url).add_attribute(Attribute::Dim),
            Cell::new(if env.active { "yes" } else { "no" }),
            Cell::new(selected_mark).fg(Color::Cyan),
        ]);
    }
    table
}

fn short_id(id: &str) -> &str {
    if id.len() > 8 { &id[..8] } else { id }
}

fn pretty_body(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .and_then(|v| serde_json::to_string_pretty(&v))
        .unwrap_or_else(|_| body.to_string())
}
