//! Command dispatch.
//!
//! Every command builds a [`Translator`] from the resolved configuration and
//! writes its result to the supplied output stream.

use std::io::Write;

use camino::Utf8Path;
use lexis::{LexisConfig, LexisError, LookupTable, ParamValue, Params, Translator};
use log::warn;

use crate::cli::{Cli, Command, RegisterArgs, ShowArgs, TableArgs, TableKind, TranslateArgs};
use crate::error::{CliError, Result};
use crate::output::{
    format_catalogue, format_codes, format_languages, format_registration, format_table_entry,
    has_failures,
};

/// Configuration file read from the working directory when `--config` is
/// not given.
pub const DEFAULT_CONFIG: &str = "lexis.toml";

/// Execute the parsed command line.
///
/// # Errors
///
/// Returns [`CliError`] when configuration cannot be loaded or the command
/// fails.
pub fn run(cli: &Cli, stdout: &mut dyn Write) -> Result<()> {
    let config = load_config(cli)?;
    let translator = Translator::from_config(&config);

    match &cli.command {
        Command::Translate(args) => translate(&translator, args, stdout),
        Command::Register(args) => register(&translator, args, stdout),
        Command::Languages => languages(&translator, stdout),
        Command::Show(args) => show(&translator, args, stdout),
        Command::Table(args) => table(&config, args, stdout),
    }
}

/// Configuration named by `--config`, else `./lexis.toml` when present, else
/// defaults; `--root` overrides the system root.
///
/// # Errors
///
/// Returns [`CliError::Lexis`] when the configuration file is invalid.
pub fn load_config(cli: &Cli) -> Result<LexisConfig> {
    let mut config = match &cli.config {
        Some(path) => LexisConfig::load(path)?,
        None if Utf8Path::new(DEFAULT_CONFIG).is_file() => {
            LexisConfig::load(Utf8Path::new(DEFAULT_CONFIG))?
        }
        None => LexisConfig::default(),
    };
    if let Some(root) = &cli.root {
        config.system_root.clone_from(root);
    }
    Ok(config)
}

/// Parse a `name=value` parameter.
///
/// Values that spell an integer or a decimal number become numeric
/// parameters; anything else is text.
///
/// # Errors
///
/// Returns [`CliError::InvalidParameter`] when `=` is missing or the name is
/// empty.
pub fn parse_param(raw: &str) -> Result<(String, ParamValue)> {
    let Some((key, text)) = raw.split_once('=') else {
        return Err(CliError::InvalidParameter { raw: raw.to_owned() });
    };
    let name = key.trim();
    if name.is_empty() {
        return Err(CliError::InvalidParameter { raw: raw.to_owned() });
    }

    let value = if let Ok(integer) = text.parse::<i64>() {
        ParamValue::Integer(integer)
    } else if let Ok(float) = text.parse::<f64>() {
        ParamValue::Float(float)
    } else {
        ParamValue::from(text)
    };
    Ok((name.to_owned(), value))
}

fn target_language(translator: &Translator, explicit: Option<&str>) -> String {
    explicit.map_or_else(
        || translator.default_language().into_language(),
        str::to_owned,
    )
}

fn translate(translator: &Translator, args: &TranslateArgs, stdout: &mut dyn Write) -> Result<()> {
    let params = args
        .params
        .iter()
        .map(|raw| parse_param(raw))
        .collect::<Result<Params>>()?;
    let language = target_language(translator, args.language.as_deref());

    let text = translator.translate(&args.category, &args.message, &params, &language)?;
    writeln!(stdout, "{text}")?;
    Ok(())
}

fn register(translator: &Translator, args: &RegisterArgs, stdout: &mut dyn Write) -> Result<()> {
    let mut report = translator.register(&args.category, &args.message);
    if let Some(error) = report.languages_error.take() {
        return Err(error.into());
    }

    write!(stdout, "{}", format_registration(&report))?;
    if has_failures(&report) {
        warn!(target: "lexis::cli", "`{}` is not registered in every language", args.message);
    }
    Ok(())
}

fn languages(translator: &Translator, stdout: &mut dyn Write) -> Result<()> {
    let list = translator.languages().languages()?;
    write!(stdout, "{}", format_languages(list))?;
    Ok(())
}

fn show(translator: &Translator, args: &ShowArgs, stdout: &mut dyn Write) -> Result<()> {
    let language = target_language(translator, args.language.as_deref());
    let store = translator.store();
    let base = store.paths().base_for(&args.category);

    let catalogue = store
        .load(&language, &args.category, &base)
        .map_err(LexisError::from)?;
    let Some(catalogue) = catalogue else {
        return Err(CliError::MissingCatalogue {
            path: store.file_path(&language, &args.category, &base),
            category: args.category.clone(),
            language,
        });
    };

    write!(stdout, "{}", format_catalogue(&catalogue))?;
    Ok(())
}

fn table(config: &LexisConfig, args: &TableArgs, stdout: &mut dyn Write) -> Result<()> {
    let table = match args.table {
        TableKind::Layouts => LookupTable::layouts(config),
        TableKind::Dates => LookupTable::dates(config),
    };

    let Some(language) = &args.language else {
        write!(stdout, "{}", format_codes(table.languages()?))?;
        return Ok(());
    };

    let Some(entry) = table.for_language(language)? else {
        return Err(CliError::MissingTableEntry {
            table: table.path().to_path_buf(),
            language: language.clone(),
        });
    };
    write!(stdout, "{}", format_table_entry(entry))?;
    Ok(())
}
