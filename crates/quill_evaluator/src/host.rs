//! The environment builtins run against.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::time::{SystemTime, UNIX_EPOCH};

/// Supplies the behaviour of `print`, `input` and `rnd`.
pub trait Host {
    fn print(&mut self, text: &str) -> io::Result<()>;

    /// Read one line, without its line terminator.
    fn input(&mut self) -> io::Result<String>;

    /// A number in `0..max`, or 0 when `max` is not positive.
    fn random(&mut self, max: i64) -> i64;
}

/// xorshift64*; good enough for `rnd` and needs no state beyond one word.
#[derive(Debug, Clone)]
struct XorShift(u64);

impl XorShift {
    fn new(seed: u64) -> Self {
        XorShift(seed | 1)
    }

    fn below(&mut self, max: i64) -> i64 {
        if max <= 0 {
            return 0;
        }
        let mut x = self.0;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.0 = x;
        (x.wrapping_mul(0x2545_F491_4F6C_DD1D) % max as u64) as i64
    }
}

/// Standard input and output.
#[derive(Debug)]
pub struct StdHost {
    rng: XorShift,
}

impl StdHost {
    pub fn new() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0x9E37_79B9_7F4A_7C15, |d| d.as_nanos() as u64);
        Self {
            rng: XorShift::new(seed),
        }
    }
}

impl Default for StdHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for StdHost {
    fn print(&mut self, text: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", text)?;
        stdout.flush()
    }

    fn input(&mut self) -> io::Result<String> {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(line)
    }

    fn random(&mut self, max: i64) -> i64 {
        self.rng.below(max)
    }
}

/// Collects output in memory and serves queued input lines.
#[derive(Debug)]
pub struct BufferedHost {
    pub output: Vec<String>,
    input: VecDeque<String>,
    rng: XorShift,
}

impl BufferedHost {
    pub fn new() -> Self {
        Self::with_input(Vec::<String>::new())
    }

    pub fn with_input<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            output: Vec::new(),
            input: lines.into_iter().map(Into::into).collect(),
            rng: XorShift::new(42),
        }
    }
}

impl Default for BufferedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for BufferedHost {
    fn print(&mut self, text: &str) -> io::Result<()> {
        self.output.push(text.to_string());
        Ok(())
    }

    fn input(&mut self) -> io::Result<String> {
        self.input
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more input"))
    }

    fn random(&mut self, max: i64) -> i64 {
        self.rng.below(max)
    }
}
