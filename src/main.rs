use anyhow::{Result, bail};
use clap::Parser;
use jvm_finder::cache::load_jvm_registry;
use jvm_finder::cli::{Cli, OutputMode};
use jvm_finder::config::load_config;
use jvm_finder::extract::JavaCommandExtractor;
use jvm_finder::jvm::Jvm;
use jvm_finder::log::Logger;
use jvm_finder::rules::SelectionRules;
use jvm_finder::scan::find_all_java_executables;
use jvm_finder::select::select;

/// Resolves the best matching JVM in four steps: discover launchers under
/// the configured lookup paths, reconcile them against the metadata cache,
/// build the selection rules from CLI arguments and configuration, and
/// print the winner. Logging goes to stderr so stdout carries only the
/// result.
fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.validate()?;
    let logger = Logger::stderr(cli.log_level);

    let mut config = load_config(cli.config_key.as_deref(), &logger)?;
    if let Some(cache) = cli.cache.clone() {
        config.metadata_cache_path = cache;
    }
    if let Some(extractor) = cli.extractor.clone() {
        config.metadata_extractor_classpath = extractor;
    }

    let java_executables = find_all_java_executables(&config.lookup_paths, &logger)?;
    let extractor = JavaCommandExtractor::new(config.metadata_extractor_classpath.clone());
    let registry = load_jvm_registry(
        &extractor,
        &config.metadata_cache_path,
        &java_executables,
        &logger,
    )?;

    let programs = cli.programs();
    let rules = SelectionRules::resolve(
        &config,
        cli.min_java_version,
        cli.max_java_version,
        cli.vendors.clone(),
        programs.clone(),
        &logger,
    );

    match select(&rules, &registry.jvms, &logger) {
        Some(jvm) => print_output(cli.output_mode, &programs, &jvm),
        None => bail!("unable to find a JVM matching requirements {rules}"),
    }
}

fn print_output(output_mode: OutputMode, programs: &[String], jvm: &Jvm) -> Result<()> {
    match output_mode {
        OutputMode::JavaHome => println!("{}", jvm.java_home.display()),
        OutputMode::Binary => {
            for program in programs {
                println!("{}", jvm.java_home.join("bin").join(program).display());
            }
        }
    }
    Ok(())
}
