//! Command-line surface.

use clap::Parser;
use clap_complete::Shell;

use crate::app::workflow::Request;

/// Find a test by method, class or module and run it through the configured test runner.
///
/// Runner options follow the target and are passed through verbatim. Put them after `--` when
/// they collide with testpick's own flags.
#[derive(Debug, Parser)]
#[command(name = "testpick", author, version, about, long_about = None)]
pub struct Cli {
    /// Re-run the last resolved target
    #[arg(short, long)]
    pub repeat: bool,

    /// With --repeat, replace the remembered runner options with the ones given now
    #[arg(short, long, requires = "repeat")]
    pub clear: bool,

    /// Print the resolved target and command line without running it
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<Shell>,

    /// Test method, test class, or module path; omit to pick a module interactively
    pub target: Option<String>,

    /// Options passed to the test runner
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub options: Vec<String>,
}

impl Cli {
    /// Translate the parsed arguments into a workflow request. In repeat mode every positional
    /// argument is a runner option.
    pub fn request(&self) -> Request {
        if self.repeat {
            let options: Vec<&str> = self
                .target
                .iter()
                .chain(self.options.iter())
                .map(String::as_str)
                .collect();
            if !self.clear && !options.is_empty() {
                tracing::warn!("ignoring runner options without --clear; reusing remembered ones");
            }
            return Request::Repeat {
                override_options: self.clear.then(|| options.join(" ")),
            };
        }

        Request::Resolve {
            token: self.target.clone(),
            options: self.options.join(" "),
        }
    }
}
