//! emx-textio CLI
//!
//! Copy text between standard streams and files, transcoding on the way.
//!
//! ```text
//! emx-textio -i                 # stdin (BOM or host encoding) → stdout (host)
//! emx-textio -f in.txt          # file → stdout
//! emx-textio -o -utf16be        # stdin → stdout as UTF-16BE
//! emx-textio -o -f out.txt -utf32le --text "hello"
//! ```

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use emx_textio::{Encoding, Target, TextIoConfig, TextReader, TextWriter};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::debug;

/// Encoding flags that are also accepted with a single dash (`-utf8`)
const ENCODING_FLAGS: &[&str] = &["host", "utf8", "utf16be", "utf16le", "utf32be", "utf32le"];

#[derive(Parser, Debug)]
#[command(name = "emx-textio")]
#[command(author = "nzinfo <li.monan@gmail.com>")]
#[command(version)]
#[command(about = "Encoding-aware text stream tool")]
#[command(group(ArgGroup::new("encoding").args(ENCODING_FLAGS).multiple(false)))]
struct Cli {
    /// Read text from standard input
    #[arg(short = 'i')]
    stdin: bool,

    /// Write text to standard output, or to the -f file
    #[arg(short = 'o')]
    stdout: bool,

    /// File to read from; with -i or -o, the file to write to
    #[arg(short = 'f', value_name = "PATH")]
    file: Option<PathBuf>,

    /// Use the host encoding
    #[arg(long)]
    host: bool,

    /// Use UTF-8
    #[arg(long)]
    utf8: bool,

    /// Use UTF-16, big endian
    #[arg(long)]
    utf16be: bool,

    /// Use UTF-16, little endian
    #[arg(long)]
    utf16le: bool,

    /// Use UTF-32, big endian
    #[arg(long)]
    utf32be: bool,

    /// Use UTF-32, little endian
    #[arg(long)]
    utf32le: bool,

    /// Start the output with a byte order mark
    #[arg(long)]
    bom: bool,

    /// Write this text instead of copying input lines
    #[arg(long, value_name = "TEXT")]
    text: Option<String>,
}

impl Cli {
    fn encoding(&self) -> Option<Encoding> {
        [
            (self.host, Encoding::Host),
            (self.utf8, Encoding::Utf8),
            (self.utf16be, Encoding::Utf16Be),
            (self.utf16le, Encoding::Utf16Le),
            (self.utf32be, Encoding::Utf32Be),
            (self.utf32le, Encoding::Utf32Le),
        ]
        .into_iter()
        .find_map(|(set, enc)| set.then_some(enc))
    }

    /// The -f file is the output when input comes from stdin or output is requested
    fn file_is_output(&self) -> bool {
        self.stdin || self.stdout
    }

    fn input_target(&self) -> Target {
        match &self.file {
            Some(path) if !self.file_is_output() => Target::Path(path.clone()),
            _ => Target::Stdin,
        }
    }

    fn output_target(&self) -> Target {
        match &self.file {
            Some(path) if self.file_is_output() => Target::Path(path.clone()),
            _ => Target::Stdout,
        }
    }

    /// (input, output) encodings: the flag applies to output with -o, to input otherwise
    fn encodings(&self) -> (Option<Encoding>, Option<Encoding>) {
        if self.stdout {
            (None, self.encoding())
        } else {
            (self.encoding(), None)
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let config = TextIoConfig::from_env().with_emit_bom(cli.bom);
    let (input_encoding, output_encoding) = cli.encodings();
    debug!(?cli, host = %config.host_encoding, "starting");

    // Open the input first so a missing input never truncates the output file
    let reader = match &cli.text {
        Some(_) => None,
        None => {
            let target = cli.input_target();
            let name = target.display_name();
            let reader = TextReader::open(target, input_encoding, &config)
                .with_context(|| format!("Failed to open input: {}", name))?;
            debug!(input = %name, encoding = %reader.encoding(), had_bom = reader.had_bom(), "input ready");
            Some((reader, name))
        }
    };

    let target = cli.output_target();
    let output_name = target.display_name();
    let mut writer = TextWriter::open(target, output_encoding, &config)
        .with_context(|| format!("Failed to open output: {}", output_name))?;

    match reader {
        Some((mut reader, input_name)) => {
            while let Some(line) = reader
                .read_line()
                .with_context(|| format!("Failed to read: {}", input_name))?
            {
                writer
                    .write_line(&line)
                    .with_context(|| format!("Failed to write: {}", output_name))?;
            }
            debug!(lines = reader.line_number(), "input finished");
            reader.close().with_context(|| format!("Failed to close: {}", input_name))?;
        }
        None => {
            let text = cli.text.as_deref().unwrap_or_default();
            writer
                .write_str(text)
                .with_context(|| format!("Failed to write: {}", output_name))?;
        }
    }

    writer.close().with_context(|| format!("Failed to close: {}", output_name))?;
    Ok(())
}

/// Rewrite `-utf8` style flags to `--utf8`
fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            let legacy = arg
                .to_str()
                .and_then(|s| s.strip_prefix('-'))
                .filter(|flag| ENCODING_FLAGS.contains(flag));
            match legacy {
                Some(flag) => OsString::from(format!("--{}", flag)),
                None => arg,
            }
        })
        .collect()
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    // stdout carries text data, so logs go to stderr (RUST_LOG=debug for details)
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
