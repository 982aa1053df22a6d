use std::env;

use anyhow::{Context, Result};
use tracing::debug;

use super::{args::Arguments, report};
use crate::{
    config::{CONFIG_FILE_NAME, Config, load_config},
    core::{
        GenerateOptions, GenerateSummary, Generator,
        utils::{IgnoreMatcher, resolve_encoding},
    },
};

/// Runs one extraction with the config file found from the current directory.
pub fn run(args: Arguments) -> Result<GenerateSummary> {
    let cwd = env::current_dir().context("Failed to read current directory")?;
    let loaded = load_config(&cwd)?;
    if loaded.from_file {
        debug!("using {}", CONFIG_FILE_NAME);
    }

    let options = build_options(&args, &loaded.config)?;
    let dry_run = options.dry_run;

    report::print_banner(&options);
    let summary = Generator::new(options).run(|event| report::print_progress(&event))?;
    report::print_summary(&summary, dry_run);

    Ok(summary)
}

/// Merges arguments over the config file. Arguments win.
pub fn build_options(args: &Arguments, config: &Config) -> Result<GenerateOptions> {
    let encoding_label = args.encoding.as_deref().unwrap_or(&config.encoding);
    let encoding = resolve_encoding(encoding_label)?;

    let ignores = IgnoreMatcher::new(&args.template_dir, &config.ignores)
        .context("Invalid glob pattern in 'ignores'")?;

    let mut options = GenerateOptions::new(&args.template_dir, &args.resource_dir);
    options.encoding = encoding;
    options.encoding_label = encoding_label.to_string();
    options.template_extension = config.template_extension.trim_start_matches('.').to_string();
    options.ignores = ignores;
    options.keep_going = args.keep_going || config.keep_going;
    options.dry_run = args.dry_run;

    Ok(options)
}
