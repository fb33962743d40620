use std::sync::Arc;

use clap::{CommandFactory, Parser};
use tracing::{error, info};

use readygate::cli::{Args, Plan};
use readygate::logger::logger_init;
use readygate::{
    CompletionHandler, EXIT_MISCONFIGURATION, EXIT_RUNTIME, HostsFile, ProbeRef, Resolver,
    Subscribe, WaitCoordinator, WaitError,
};

// The runtime is built by hand: the logger captures the local UTC offset, which
// is only readable before worker threads exist.
fn main() {
    let code = match Args::try_parse() {
        Ok(args) => run(args),
        Err(e) => {
            // help and version exit 0, usage errors exit 2
            let _ = e.print();
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn run(args: Args) -> i32 {
    let plan = match args.into_plan() {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{}", Args::command().render_usage());
            return e.exit_code();
        }
    };
    if let Err(e) = logger_init(&plan.logger) {
        eprintln!("{e}");
        return EXIT_MISCONFIGURATION;
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(target: "readygate", "cannot start the async runtime: {e}");
            return EXIT_RUNTIME;
        }
    };

    match runtime.block_on(wait(plan)) {
        Ok(code) => code,
        // already reported by the completion handler
        Err(e @ (WaitError::Timeout { .. } | WaitError::Fatal { .. })) => e.exit_code(),
        Err(e) => {
            error!(target: "readygate", kind = e.as_label(), "{}", e.as_message());
            e.exit_code()
        }
    }
}

async fn wait(plan: Plan) -> Result<i32, WaitError> {
    let hosts = match &plan.hosts_file {
        Some(path) => Some(HostsFile::load(path).await?),
        None => None,
    };
    let resolved = Resolver::new(hosts).resolve_targets(plan.targets).await?;
    let probes: Vec<ProbeRef> = resolved.iter().map(|r| r.probe(&plan.config)).collect();
    info!(
        target: "readygate",
        "All targets set up. Timeout: {}s.",
        plan.config.timeout.as_secs()
    );

    let mut subscribers: Vec<Arc<dyn Subscribe>> = Vec::new();
    #[cfg(feature = "logging")]
    subscribers.push(Arc::new(readygate::LogWriter));

    let report = WaitCoordinator::new(plan.config)
        .with_subscribers(subscribers)
        .run_probes(probes)
        .await;
    info!(target: "readygate::status", "final status:\n{}", report.render());

    let handler = match plan.command {
        Some(command) => CompletionHandler::new(Box::new(command)),
        None => CompletionHandler::default(),
    };
    handler.complete(report.outcome)
}
