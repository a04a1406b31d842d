use color_eyre::Result;
use colored::Colorize;
use std::future::Future;
use std::time::Instant;
use tracing_subscriber::{EnvFilter, fmt};

#[macro_export]
macro_rules! run_test {
    ($call:expr) => {
        $crate::runner::orchestration_utils::run_test_impl(stringify!($call), $call)
    };
}

/// Runs each test in order, stopping at the first failure, then prints a summary.
#[macro_export]
macro_rules! execute_suite {
    ($context:expr, [ $($test_fn:ident),* $(,)? ]) => {{
        let total_tests = 0 $( + { let _ = stringify!($test_fn); 1 } )*;
        let mut passed_tests = 0;
        let suite_start = Instant::now();
        println!();

        $(
            run_test!($test_fn($context)).await?;
            passed_tests += 1;
        )*

        println!("{}", "─".repeat(60).truecolor(80, 80, 80));
        println!(
            "{} {}/{} map tests passed in {:.2?}.",
            " SUMMARY ".on_purple().black().bold(),
            passed_tests,
            total_tests,
            suite_start.elapsed()
        );
        println!();
    }};
}

pub async fn run_test_impl<Fut>(raw_name: &str, test: Fut) -> Result<()>
where
    Fut: Future<Output = Result<()>>,
{
    let name = raw_name.split('(').next().unwrap_or(raw_name).trim();

    println!("{}", "─".repeat(60).truecolor(80, 80, 80));
    println!("{} {}", " RUNNING ".on_cyan().black().bold(), name.cyan().bold());

    let start_time = Instant::now();
    let result = test.await;
    let elapsed = start_time.elapsed();

    match &result {
        Ok(()) => println!(
            "{} {} ({:.2?})",
            " PASSED ".on_green().black().bold(),
            name.green(),
            elapsed
        ),
        Err(e) => {
            println!(
                "{} {} ({:.2?})",
                " FAILED ".on_red().black().bold(),
                name.red(),
                elapsed
            );
            println!("\n{e:?}");
        }
    }

    result
}

pub fn setup_tracing_and_panic_handling() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,sqlx=warn,api=debug,common_services=debug,hyper=error,reqwest=error".into());

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .compact()
        .with_target(false)
        .finish();

    // A second suite in the same process keeps the first subscriber.
    let _ = tracing::subscriber::set_global_default(subscriber);
    let _ = color_eyre::install();
}
