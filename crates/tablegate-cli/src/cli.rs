use std::path::PathBuf;

pub const DEFAULT_CONFIG: &str = "tablegate.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Date,
    Query,
    Write,
    Validate,
    Suggest,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Date(DateArgs),
    Query(QueryArgs),
    Write(WriteArgs),
    Validate(ValidateArgs),
    Suggest(SuggestArgs),
}

#[derive(Debug, Clone)]
pub struct DateArgs {
    pub config: PathBuf,
    pub inputs: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct QueryArgs {
    pub config: PathBuf,
    pub columns: PathBuf,
    pub request: PathBuf,
    pub table: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone)]
pub struct WriteArgs {
    pub config: PathBuf,
    pub kind: WriteKind,
    pub columns: PathBuf,
    pub record: PathBuf,
    pub keys: Vec<String>,
    pub table: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ValidateArgs {
    pub config: PathBuf,
    pub rules: PathBuf,
    pub payload: PathBuf,
}

#[derive(Debug, Clone)]
pub struct SuggestArgs {
    pub config: PathBuf,
    pub columns: PathBuf,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    let rest = it.map(|s| s.as_str());
    match first.as_str() {
        "-h" | "--help" => Ok(Command::Help(HelpTopic::Root)),
        "date" => parse_date(rest),
        "query" => parse_query(rest),
        "write" => parse_write(rest),
        "validate" => parse_validate(rest),
        "suggest" => parse_suggest(rest),
        _ => anyhow::bail!("unknown command: {first}"),
    }
}

/// Options shared by every command.
struct Options {
    config: PathBuf,
    columns: Option<PathBuf>,
    request: Option<PathBuf>,
    record: Option<PathBuf>,
    rules: Option<PathBuf>,
    payload: Option<PathBuf>,
    keys: Vec<String>,
    table: Option<String>,
    positional: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            config: PathBuf::from(DEFAULT_CONFIG),
            columns: None,
            request: None,
            record: None,
            rules: None,
            payload: None,
            keys: Vec::new(),
            table: None,
            positional: Vec::new(),
        }
    }
}

/// Parse `--flag <v>` / `--flag=<v>` options. Returns `None` when help was requested.
fn parse_options<'a>(
    mut it: impl Iterator<Item = &'a str>,
    allowed: &[&str],
) -> anyhow::Result<Option<Options>> {
    let mut opts = Options::default();

    while let Some(token) = it.next() {
        if token == "-h" || token == "--help" {
            return Ok(None);
        }
        if !token.starts_with("--") {
            opts.positional.push(token.to_string());
            continue;
        }

        let (flag, inline) = match token.split_once('=') {
            Some((flag, value)) => (flag, Some(value.to_string())),
            None => (token, None),
        };
        if flag != "--config" && !allowed.contains(&flag) {
            anyhow::bail!("unknown argument: {token}");
        }
        let value = match inline {
            Some(v) => v,
            None => {
                let Some(v) = it.next() else {
                    anyhow::bail!("{flag} requires a value");
                };
                v.to_string()
            }
        };

        match flag {
            "--config" => opts.config = PathBuf::from(value),
            "--columns" => opts.columns = Some(PathBuf::from(value)),
            "--request" => opts.request = Some(PathBuf::from(value)),
            "--record" => opts.record = Some(PathBuf::from(value)),
            "--rules" => opts.rules = Some(PathBuf::from(value)),
            "--payload" => opts.payload = Some(PathBuf::from(value)),
            "--table" => opts.table = Some(value),
            "--keys" => {
                let parsed = split_csv(&value);
                if parsed.is_empty() {
                    anyhow::bail!("--keys must not be empty");
                }
                opts.keys = parsed;
            }
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    Ok(Some(opts))
}

fn split_csv(v: &str) -> Vec<String> {
    v.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

fn required(value: Option<PathBuf>, flag: &str) -> anyhow::Result<PathBuf> {
    match value {
        Some(v) => Ok(v),
        None => anyhow::bail!("{flag} is required"),
    }
}

fn no_positional(opts: &Options) -> anyhow::Result<()> {
    match opts.positional.first() {
        Some(extra) => anyhow::bail!("unexpected argument: {extra}"),
        None => Ok(()),
    }
}

fn parse_date<'a>(it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let Some(opts) = parse_options(it, &[])? else {
        return Ok(Command::Help(HelpTopic::Date));
    };
    if opts.positional.is_empty() {
        anyhow::bail!("date requires at least one input");
    }
    Ok(Command::Date(DateArgs {
        config: opts.config,
        inputs: opts.positional,
    }))
}

fn parse_query<'a>(it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let Some(opts) = parse_options(it, &["--columns", "--request", "--table"])? else {
        return Ok(Command::Help(HelpTopic::Query));
    };
    no_positional(&opts)?;
    Ok(Command::Query(QueryArgs {
        config: opts.config,
        columns: required(opts.columns, "--columns")?,
        request: required(opts.request, "--request")?,
        table: opts.table,
    }))
}

fn parse_write<'a>(it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let Some(mut opts) = parse_options(it, &["--columns", "--record", "--keys", "--table"])? else {
        return Ok(Command::Help(HelpTopic::Write));
    };

    let kind = match opts.positional.first().map(String::as_str) {
        Some("insert") => WriteKind::Insert,
        Some("update") => WriteKind::Update,
        Some("delete") => WriteKind::Delete,
        Some(other) => anyhow::bail!("unknown write kind: {other}"),
        None => anyhow::bail!("write requires one of: insert, update, delete"),
    };
    opts.positional.remove(0);
    no_positional(&opts)?;

    if kind != WriteKind::Insert && opts.keys.is_empty() {
        anyhow::bail!("--keys is required for update and delete");
    }

    Ok(Command::Write(WriteArgs {
        config: opts.config,
        kind,
        columns: required(opts.columns, "--columns")?,
        record: required(opts.record, "--record")?,
        keys: opts.keys,
        table: opts.table,
    }))
}

fn parse_validate<'a>(it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let Some(opts) = parse_options(it, &["--rules", "--payload"])? else {
        return Ok(Command::Help(HelpTopic::Validate));
    };
    no_positional(&opts)?;
    Ok(Command::Validate(ValidateArgs {
        config: opts.config,
        rules: required(opts.rules, "--rules")?,
        payload: required(opts.payload, "--payload")?,
    }))
}

fn parse_suggest<'a>(it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let Some(opts) = parse_options(it, &["--columns"])? else {
        return Ok(Command::Help(HelpTopic::Suggest));
    };
    no_positional(&opts)?;
    Ok(Command::Suggest(SuggestArgs {
        config: opts.config,
        columns: required(opts.columns, "--columns")?,
    }))
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
tablegate - compile parameterized SQL Server statements and validate records

USAGE:
  tablegate <COMMAND> [OPTIONS]

COMMANDS:
  date          Canonicalize day-first dates (DD/MM/YYYY[ HH:MM])
  query         Compile filters, sort and paging into SELECT / COUNT
  write         Compile INSERT / UPDATE / DELETE for a record
  validate      Validate a payload against condition rules
  suggest       Suggest condition rules from CHECK constraints

GLOBAL OPTIONS:
  --config <FILE>       Config file path (default: tablegate.toml)
  -h, --help            Print help

Run `tablegate <command> --help` for more."
            );
        }
        HelpTopic::Date => {
            println!(
                "\
USAGE:
  tablegate date <INPUT>...

Prints the ISO form of each day-first input. MM/DD/YYYY input is rejected.

OPTIONS:
  -h, --help            Print help"
            );
        }
        HelpTopic::Query => {
            println!(
                "\
USAGE:
  tablegate query --columns <FILE> --request <FILE> [OPTIONS]

OPTIONS:
  --columns <FILE>      JSON array of column descriptors
  --request <FILE>      JSON list request (filters, sort, page)
  --table <NAME>        Table name, optionally schema-qualified (default: t)
  --config <FILE>       Config file path (default: tablegate.toml)
  -h, --help            Print help"
            );
        }
        HelpTopic::Write => {
            println!(
                "\
USAGE:
  tablegate write insert --columns <FILE> --record <FILE> [OPTIONS]
  tablegate write update --columns <FILE> --record <FILE> --keys <CSV> [OPTIONS]
  tablegate write delete --columns <FILE> --record <FILE> --keys <CSV> [OPTIONS]

OPTIONS:
  --columns <FILE>      JSON array of column descriptors
  --record <FILE>       JSON record (delete also accepts an array of records)
  --keys <CSV>          Primary key columns
  --table <NAME>        Table name, optionally schema-qualified (default: t)
  --config <FILE>       Config file path (default: tablegate.toml)
  -h, --help            Print help"
            );
        }
        HelpTopic::Validate => {
            println!(
                "\
USAGE:
  tablegate validate --rules <FILE> --payload <FILE>

Exits non-zero when any record fails.

OPTIONS:
  --rules <FILE>        JSON array of condition rules
  --payload <FILE>      JSON record, or an array of records
  --config <FILE>       Config file path (default: tablegate.toml)
  -h, --help            Print help"
            );
        }
        HelpTopic::Suggest => {
            println!(
                "\
USAGE:
  tablegate suggest --columns <FILE>

OPTIONS:
  --columns <FILE>      JSON array of column descriptors with checkConstraintTexts
  --config <FILE>       Config file path (default: tablegate.toml)
  -h, --help            Print help"
            );
        }
    }
}
