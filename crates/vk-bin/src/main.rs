//! `vimkeys`: run Vim keystrokes over a text and print the result.
//!
//! ```text
//! $ vimkeys --text 'fo{caret}o\n' --keys cw
//! fo{caret}
//! -- INSERT --
//! ```
use anyhow::{Context, Result, bail};
use clap::Parser;
use core_actions::{Engine, KeyOutcome};
use core_model::{EditorModel, HostSurface};
use core_plugin::{ExtensionHost, StaticExtensionHost};
use core_state::Mode;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;

const LOG_FILE: &str = "vimkeys.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "vimkeys", version, about = "Vim key resolution over a text buffer")]
struct Args {
    /// Starting text in `{caret}` notation; `\n` and `\t` escapes are expanded.
    #[arg(long, conflicts_with = "file")]
    text: Option<String>,
    /// Read the starting text (in `{caret}` notation) from a file.
    #[arg(long)]
    file: Option<PathBuf>,
    /// Keys in Vim notation, e.g. `c2w`, `d<Esc>`, `<S-Right>`.
    #[arg(long)]
    keys: String,
    /// Configuration file path (overrides discovery of `vimkeys.toml`).
    #[arg(long = "config")]
    config: Option<PathBuf>,
    /// Load an extension in addition to those enabled in the configuration.
    #[arg(long = "extension")]
    extensions: Vec<String>,
    /// Write logs to `vimkeys.log` in this directory instead of stderr.
    #[arg(long = "log-dir")]
    log_dir: Option<PathBuf>,
}

/// Final state after all keys were applied.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Report {
    text: String,
    mode: Mode,
    outcome: KeyOutcome,
    bells: usize,
}

fn configure_logging(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    let Some(dir) = log_dir else {
        // Already installed (tests, embedding): keep the existing subscriber.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
        return Ok(None);
    };
    std::fs::create_dir_all(dir).with_context(|| format!("creating log dir {}", dir.display()))?;
    let log_path = dir.join(LOG_FILE);
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }
    let file_appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(()) => Ok(Some(guard)),
        Err(_) => Ok(None),
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

/// Expand the `\n`, `\t` and `\\` escapes a shell argument cannot carry.
fn expand_escapes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn load_text(args: &Args) -> Result<String> {
    match (&args.text, &args.file) {
        (Some(text), _) => Ok(expand_escapes(text)),
        (None, Some(path)) => {
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
        }
        (None, None) => bail!("one of --text or --file is required"),
    }
}

fn run(args: &Args) -> Result<Report> {
    let text = load_text(args)?;
    let config = core_config::load_from(args.config.clone())?;
    let options = config.options();
    let mut names = options.extensions.clone();
    names.extend(args.extensions.iter().cloned());
    debug!(target: "runtime", keymodel = ?options.keymodel, selectmode = ?options.selectmode, extensions = ?names, "options");

    let mut engine = Engine::new(options);
    let mut extensions = StaticExtensionHost::from_names(&names)?;
    extensions.load_all(&mut engine)?;

    let mut model = EditorModel::from_marked(&text)?;
    model.attach_listener(engine.guard().clone());
    let outcome = engine.handle_keys(&mut model, &args.keys)?;
    engine.pump(&mut model);

    let report = Report {
        text: model.to_marked(),
        mode: engine.mode(),
        outcome,
        bells: model.bells(),
    };
    info!(target: "runtime", mode = %report.mode, outcome = ?report.outcome, bells = report.bells, "keys_applied");
    Ok(report)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging(args.log_dir.as_deref())?;
    install_panic_hook();
    info!(target: "runtime", "startup");
    let report = run(&args)?;
    print!("{}", report.text);
    if !report.text.ends_with('\n') {
        println!();
    }
    println!("-- {} --", report.mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["vimkeys"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    /// Config path that does not exist, so a developer's own `vimkeys.toml` is ignored.
    fn no_config(dir: &tempfile::TempDir) -> String {
        dir.path().join("absent.toml").display().to_string()
    }

    #[test]
    fn escapes_expand() {
        assert_eq!(expand_escapes("fo{caret}o\\n"), "fo{caret}o\n");
        assert_eq!(expand_escapes("a\\tb\\\\n\\x"), "a\tb\\n\\x");
    }

    #[test]
    fn change_word_from_text() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = no_config(&dir);
        let report = run(&args(&["--text", "fo{caret}o\\n", "--keys", "cw", "--config", &cfg])).unwrap();
        assert_eq!(report.text, "fo{caret}\n");
        assert_eq!(report.mode, Mode::Insert);
        assert_eq!(report.bells, 0);
    }

    #[test]
    fn text_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = no_config(&dir);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{caret}}one\ntwo\n").unwrap();
        let path = file.path().display().to_string();
        let report = run(&args(&["--file", &path, "--keys", "dd", "--config", &cfg])).unwrap();
        assert_eq!(report.text, "{caret}two\n");
        assert_eq!(report.mode, Mode::Normal);
    }

    #[test]
    fn config_enables_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vimkeys.toml");
        std::fs::write(&path, "[extensions]\nenabled = [\"argtextobj\"]\n").unwrap();
        let cfg = path.display().to_string();
        let report = run(&args(&["--text", "f(a{caret}b, c)\\n", "--keys", "dia", "--config", &cfg])).unwrap();
        assert_eq!(report.text, "f({caret}, c)\n");
    }

    #[test]
    fn extension_flag_adds_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = no_config(&dir);
        let report = run(&args(&[
            "--text",
            "{caret}parseHTML\\n",
            "--keys",
            "\\w",
            "--extension",
            "camelcasemotion",
            "--config",
            &cfg,
        ]))
        .unwrap();
        assert_eq!(report.text, "parse{caret}HTML\n");
    }

    #[test]
    fn unknown_extension_fails() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = no_config(&dir);
        let err = run(&args(&["--text", "{caret}x\\n", "--keys", "l", "--extension", "nope", "--config", &cfg]))
            .unwrap_err();
        assert!(err.to_string().contains("unknown extension: nope"));
    }

    #[test]
    fn keymodel_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vimkeys.toml");
        std::fs::write(&path, "[options]\nkeymodel = [\"startsel\", \"stopsel\"]\nselectmode = [\"key\"]\n").unwrap();
        let cfg = path.display().to_string();
        let report = run(&args(&["--text", "{caret}abc\\n", "--keys", "<S-Right>", "--config", &cfg])).unwrap();
        assert_eq!(report.mode, Mode::Select(core_state::SelectionKind::Character));
    }

    #[test]
    fn missing_input_is_an_error() {
        let err = run(&args(&["--keys", "x"])).unwrap_err();
        assert!(err.to_string().contains("--text or --file"));
    }

    #[test]
    fn log_dir_receives_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let guard = configure_logging(Some(dir.path())).unwrap();
        drop(guard);
        // A subscriber may already be installed by another test; only the
        // directory itself is guaranteed.
        assert!(dir.path().is_dir());
    }
}
