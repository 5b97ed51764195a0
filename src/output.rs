use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use secretforge::strength::{self, Rating};
use secretforge::{PasswordSpec, Secret};

/// Writes to the file if given, otherwise to stdout.
pub fn write_to<F>(output_file: Option<&Path>, render: F) -> io::Result<()>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    match output_file {
        Some(path) => {
            let f = File::create(path)?;
            let mut out = BufWriter::new(f);
            render(&mut out)?;
            out.flush()
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            render(&mut out)?;
            out.flush()
        }
    }
}

/// One secret per line, each optionally followed by its strength report.
pub fn format_secrets(
    secrets: &[Secret],
    stats: bool,
    guesses_per_second: f64,
    out: &mut dyn Write,
) -> io::Result<()> {
    for secret in secrets {
        writeln!(out, "{}", secret.expose())?;
        if stats {
            format_report(secret.entropy(), guesses_per_second, out)?;
        }
    }
    Ok(())
}

/// The spec inferred from a sample and the strength it implies.
pub fn format_inspection(
    spec: &PasswordSpec,
    entropy: f64,
    guesses_per_second: f64,
    out: &mut dyn Write,
) -> io::Result<()> {
    let classes: Vec<String> = spec.classes.iter().map(|c| c.to_string()).collect();
    writeln!(out, "length: {}", spec.length)?;
    writeln!(out, "classes: {}", classes.join(", "))?;
    writeln!(out, "repeat: {}", spec.allow_repeat)?;
    format_report(entropy, guesses_per_second, out)
}

fn format_report(entropy: f64, guesses_per_second: f64, out: &mut dyn Write) -> io::Result<()> {
    let seconds = strength::seconds_to_crack(entropy, guesses_per_second);
    writeln!(out, "  entropy: {:.2} bits", entropy)?;
    writeln!(out, "  keyspace: {}", format_keyspace(strength::keyspace(entropy)))?;
    writeln!(
        out,
        "  time to crack: {} at {:.0e} guesses/s",
        strength::describe_duration(seconds),
        guesses_per_second
    )?;
    writeln!(out, "  rating: {}", Rating::from_bits(entropy).label())?;
    Ok(())
}

fn format_keyspace(keyspace: f64) -> String {
    if !keyspace.is_finite() {
        "beyond f64 range".into()
    } else if keyspace < 1e6 {
        format!("{:.0}", keyspace)
    } else {
        format!("{:.3e}", keyspace)
    }
}
