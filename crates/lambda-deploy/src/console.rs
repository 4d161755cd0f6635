use colored::Colorize;
use lambda_deploy_core::{Progress, Reporter};

/// Prints progress lines to stdout as they happen
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&self, progress: &Progress) {
        println!("{}", render(progress));
    }
}

fn render(progress: &Progress) -> String {
    let line = progress.to_string();
    match progress {
        Progress::DeployStarted { .. } => line.blue().bold().to_string(),
        Progress::RegionStarted { .. } => format!("\n{}", line.cyan().bold()),
        Progress::BucketCreating { .. }
        | Progress::StackCreating { .. }
        | Progress::StackUpdating { .. } => line.yellow().to_string(),
        Progress::StackUnchanged { .. } => line.green().to_string(),
        Progress::StackEvent { .. } => format!("  {}", line.dimmed()),
        Progress::FunctionUpdating { .. } | Progress::Uploading { .. } => line,
        Progress::RegionFinished { .. } => format!("{} {}", "✓".green(), line.green()),
        Progress::Finished { .. } => format!("\n{}", line.green().bold()),
    }
}
