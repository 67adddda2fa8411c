use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::{Context, ensure};
use rand::SeedableRng as _;
use rand_pcg::Pcg64Mcg;

/// Destination for JSON output: stdout or a file.
#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    /// Write `value` as pretty JSON to `output_path`, or to stdout if `None`
    ///
    /// # Returns
    ///
    /// Human-readable name of the destination, for log messages
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be created or written
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<String>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)?;
        Ok(output.display_path())
    }

    /// Open a file output for `Some(path)`, stdout otherwise
    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    /// Create (or truncate) the file at `path`
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be created
    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    /// Write `value` as pretty JSON followed by a newline, then flush
    ///
    /// # Errors
    ///
    /// Returns error if serialization or writing fails
    pub fn write_json<T>(&mut self, value: T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, &value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

/// Read and deserialize a JSON file
///
/// # Arguments
///
/// * `file_kind` - Description of the file used in error messages
/// * `path` - Path to the JSON file
///
/// # Returns
///
/// Deserialized value
///
/// # Errors
///
/// Returns error if file cannot be opened or parsed
pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Read a whole text file, such as a name list
///
/// # Arguments
///
/// * `file_kind` - Description of the file used in error messages
/// * `path` - Path to the text file
///
/// # Errors
///
/// Returns error if file cannot be read
pub fn read_text_file<P>(file_kind: &str, path: P) -> anyhow::Result<String>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} file: {}", file_kind, path.display()))
}

/// Deterministic generator when `seed` is given, OS-seeded otherwise.
pub fn make_rng(seed: Option<u64>) -> Pcg64Mcg {
    match seed {
        Some(seed) => Pcg64Mcg::seed_from_u64(seed),
        None => Pcg64Mcg::from_rng(&mut rand::rng()),
    }
}

/// Branch probabilities of 1 grow trees until every path is exhausted.
pub fn check_branch_probability(name: &str, value: f64) -> anyhow::Result<()> {
    ensure!(
        (0.0..1.0).contains(&value),
        "{name} must be in [0, 1), got {value}"
    );
    Ok(())
}

/// Reject rates outside `[0, 1]`.
pub fn check_rate(name: &str, value: f64) -> anyhow::Result<()> {
    ensure!(
        (0.0..=1.0).contains(&value),
        "{name} must be in [0, 1], got {value}"
    );
    Ok(())
}
