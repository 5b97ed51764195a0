mod cli;
mod logging;
mod output;

use std::path::Path;
use std::process;

use clap::Parser;

use secretforge::config::{self, Config};
use secretforge::{
    infer_spec, CharClass, Engine, Error, PassphraseSpec, PasswordSpec, Result, Secret, Source,
};

use cli::{Cli, Command, PassphraseArgs, PasswordArgs};

/// Build the configuration by layering: defaults → TOML file → CLI overrides.
fn build_config(cli: &Cli) -> Config {
    let mut cfg = match config::load_config(cli.config_file.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("{}", e);
            Config::default()
        }
    };

    if let Some(v) = cli.rng {
        cfg.rng.backend = v;
    }
    match &cli.command {
        Command::Password(args) => {
            if let Some(v) = args.length {
                cfg.password.length = v;
            }
            if args.no_repeat {
                cfg.password.allow_repeat = false;
            }
        }
        Command::Passphrase(args) => {
            if let Some(v) = args.words {
                cfg.passphrase.words = v;
            }
            if let Some(v) = &args.separator {
                cfg.passphrase.separator = v.clone();
            }
            if let Some(v) = args.strategy {
                cfg.passphrase.strategy = v;
            }
            if let Some(v) = &args.word_list {
                cfg.passphrase.word_list = Some(v.clone());
            }
            if let Some(v) = &args.syllable_list {
                cfg.passphrase.syllable_list = Some(v.clone());
            }
        }
        Command::Inspect(_) => {}
    }

    cfg.validate();
    cfg
}

fn password_spec(args: &PasswordArgs, cfg: &Config) -> Result<PasswordSpec> {
    let mut classes = match &args.classes {
        Some(names) => names
            .iter()
            .filter(|n| !n.trim().is_empty())
            .map(|n| {
                CharClass::from_name(n)
                    .ok_or_else(|| Error::InvalidArgs(format!("unknown character class: {}", n)))
            })
            .collect::<Result<Vec<_>>>()?,
        None if args.custom.is_empty() => cfg.password.classes.clone(),
        None => Vec::new(),
    };
    classes.extend(args.custom.iter().cloned().map(CharClass::Custom));

    Ok(PasswordSpec {
        length: cfg.password.length,
        classes,
        include: args.include.clone(),
        exclude: args.exclude.clone(),
        allow_repeat: cfg.password.allow_repeat,
    })
}

fn passphrase_spec(args: &PassphraseArgs, cfg: &Config) -> PassphraseSpec {
    PassphraseSpec {
        words: cfg.passphrase.words,
        separator: cfg.passphrase.separator.clone(),
        strategy: cfg.passphrase.strategy,
        include: args.include.clone(),
        exclude: args.exclude.clone(),
    }
}

fn generate_batch<F>(count: usize, mut next: F) -> Result<Vec<Secret>>
where
    F: FnMut() -> Result<Secret>,
{
    if count == 0 {
        return Err(Error::InvalidArgs("count must be greater than 0".into()));
    }
    (0..count).map(|_| next()).collect()
}

fn run(cli: &Cli, cfg: &Config) -> Result<()> {
    let output_file: Option<&Path> = cli.output_file.as_deref();

    match &cli.command {
        Command::Password(args) => {
            let spec = password_spec(args, cfg)?;
            let source = Source::from_config(&cfg.rng)?;
            log::info!("random source: {}", source.name());
            let mut engine = Engine::from_config(source, cfg)?;
            let secrets = generate_batch(args.count, || engine.password(&spec))?;
            output::write_to(output_file, |w| {
                output::format_secrets(&secrets, args.stats, cfg.strength.guesses_per_second, w)
            })?;
        }
        Command::Passphrase(args) => {
            let spec = passphrase_spec(args, cfg);
            let source = Source::from_config(&cfg.rng)?;
            log::info!("random source: {}", source.name());
            let mut engine = Engine::from_config(source, cfg)?;
            let secrets = generate_batch(args.count, || engine.passphrase(&spec))?;
            output::write_to(output_file, |w| {
                output::format_secrets(&secrets, args.stats, cfg.strength.guesses_per_second, w)
            })?;
        }
        Command::Inspect(args) => {
            let spec = infer_spec(&args.sample);
            let entropy = if spec.length == 0 { 0.0 } else { spec.entropy()? };
            output::write_to(output_file, |w| {
                output::format_inspection(&spec, entropy, cfg.strength.guesses_per_second, w)
            })?;
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    logging::init(&cli.log);
    let cfg = build_config(&cli);

    if let Err(e) = run(&cli, &cfg) {
        log::error!("{}", e);
        process::exit(1);
    }
}
