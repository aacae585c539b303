pub mod evaluator;
pub mod executor;
pub mod reporter;

pub use evaluator::evaluate_assertion;
pub use executor::{RunnerOptions, SuiteRunner, apply_run_to_suite};
pub use reporter::RunReporter;
