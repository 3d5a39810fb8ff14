use std::{
    fs::File,
    io::{self, BufReader, Read, Write},
    path::PathBuf,
    process::ExitCode,
};

use chacha20block::{read_words, Counter, Error, State, Zeroize};
use log::{debug, LevelFilter, Log, Metadata, Record};

xflags::xflags! {
    /// Computes one ChaCha20 block. Reads exactly 32 key bytes followed by 8 nonce bytes (the
    /// input must end there) and writes the 64-byte block to stdout.
    cmd block {
        /// Read key and nonce from this file instead of stdin.
        optional -i, --input path: PathBuf
        /// Block counter (slot 12). Defaults to 0.
        optional -c, --counter counter: u32
        /// High counter word (slot 13). Makes the counter two words wide.
        optional --counter-hi counter_hi: u32
        /// Print the block as lowercase hex instead of raw bytes.
        optional --hex
        /// Log debug lines (input source, rejected input, counter and nonce) to stderr.
        optional -v, --verbose
    }
}

/// Key words plus nonce words expected on the input channel.
const INPUT_WORDS: usize = 10;
const INPUT_BYTES: usize = 4 * INPUT_WORDS;

fn main() -> ExitCode {
    let flags = Block::from_env_or_exit();
    init_logging(flags.verbose);
    match run(&flags) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("{}", format_record(record));
        }
    }

    fn flush(&self) {}
}

fn format_record(record: &Record<'_>) -> String {
    format!("[{} {}] {}", record.level(), record.target(), record.args())
}

/// Warnings always reach stderr; `--verbose` adds the debug lines of this binary and the library.
fn init_logging(verbose: bool) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        });
    }
}

fn block_counter(flags: &Block) -> Counter {
    let lo = flags.counter.unwrap_or(0);
    match flags.counter_hi {
        Some(hi) => Counter::Wide([lo, hi]),
        None => Counter::Narrow(lo),
    }
}

fn run(flags: &Block) -> Result<(), Error> {
    let counter = block_counter(flags);
    let stdout = io::stdout().lock();
    match &flags.input {
        Some(path) => {
            debug!("reading key and nonce from {}", path.display());
            let file = BufReader::new(File::open(path)?);
            emit_block(file, stdout, counter, flags.hex)
        }
        None => emit_block(io::stdin().lock(), stdout, counter, flags.hex),
    }
}

fn emit_block(
    mut input: impl Read,
    mut out: impl Write,
    counter: Counter,
    as_hex: bool,
) -> Result<(), Error> {
    // 8 key words, then 2 nonce words.
    let mut words = [0; INPUT_WORDS];
    read_words(&mut input, &mut words)?;
    let trailing = io::copy(&mut input, &mut io::sink())?;
    if trailing > 0 {
        words.zeroize();
        debug!("rejecting {trailing} bytes after the nonce");
        return Err(Error::InvalidLength {
            words: INPUT_WORDS,
            bytes: INPUT_BYTES.saturating_add(usize::try_from(trailing).unwrap_or(usize::MAX)),
        });
    }

    let mut state = State::build(&words[..8], counter, &words[8..])?;
    words.zeroize();
    debug!("transforming {state:?}");
    let block = state.transform().to_bytes();
    state.zeroize();

    if as_hex {
        let mut line = hex::encode(block);
        line.push('\n');
        out.write_all(line.as_bytes())?;
    } else {
        out.write_all(&block)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chacha20block::{keystream_block, Key, Nonce};
    use log::Level;

    use super::*;

    fn input() -> Vec<u8> {
        let mut bytes: Vec<u8> = (0..32).collect();
        bytes.extend_from_slice(&[0, 0, 0, 0x4a, 0, 0, 0, 0]);
        bytes
    }

    fn flags(counter: Option<u32>, counter_hi: Option<u32>) -> Block {
        Block {
            input: None,
            counter,
            counter_hi,
            hex: false,
            verbose: false,
        }
    }

    #[test]
    fn raw_output_matches_library() {
        let input = input();
        let mut out = Vec::new();
        emit_block(&input[..], &mut out, Counter::Narrow(1), false).unwrap();

        let key = Key::try_from(&input[..32]).unwrap();
        let nonce = Nonce::try_from(&input[32..]).unwrap();
        assert_eq!(out, keystream_block(&key, Counter::Narrow(1), &nonce));
    }

    #[test]
    fn hex_output() {
        let mut out = Vec::new();
        emit_block(&input()[..], &mut out, Counter::Narrow(1), true).unwrap();
        let out = String::from_utf8(out).unwrap();
        let expected = "dadbafefb8dd61c88255c7bce4fb7d9316c4ab7176a90d35e193a8fb2cca72d2\
                        29087517d72259db6784e4e2b0f503020579e6cce17cca4b452d3b329fec5822\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn counter_flags() {
        assert_eq!(block_counter(&flags(None, None)), Counter::Narrow(0));
        assert_eq!(block_counter(&flags(Some(9), None)), Counter::Narrow(9));
        assert_eq!(block_counter(&flags(None, Some(2))), Counter::Wide([0, 2]));
        assert_eq!(block_counter(&flags(Some(9), Some(2))), Counter::Wide([9, 2]));
    }

    #[test]
    fn wide_counter_output_matches_library() {
        let input = input();
        let counter = block_counter(&flags(Some(0xdead_beef), Some(7)));
        let mut out = Vec::new();
        emit_block(&input[..], &mut out, counter, false).unwrap();

        let key = Key::try_from(&input[..32]).unwrap();
        let nonce = Nonce::try_from(&input[32..]).unwrap();
        let wide = keystream_block(&key, Counter::Wide([0xdead_beef, 7]), &nonce);
        assert_eq!(out, wide);
        assert_ne!(out, keystream_block(&key, Counter::Narrow(0xdead_beef), &nonce));
    }

    #[test]
    fn short_input_is_reported() {
        let input = input();
        let mut out = Vec::new();
        assert_eq!(
            emit_block(&input[..39], &mut out, Counter::Narrow(0), false),
            Err(Error::ShortRead {
                needed: 40,
                available: 39
            })
        );
        assert!(out.is_empty());
    }

    #[test]
    fn trailing_input_is_rejected() {
        let mut input = input();
        input.extend_from_slice(b"extra");
        let mut out = Vec::new();
        assert_eq!(
            emit_block(&input[..], &mut out, Counter::Narrow(0), false),
            Err(Error::InvalidLength {
                words: 10,
                bytes: 45
            })
        );
        assert!(out.is_empty());
    }

    #[test]
    fn verbose_turns_on_debug_lines() {
        init_logging(true);
        let debug = Metadata::builder().level(Level::Debug).build();
        let trace = Metadata::builder().level(Level::Trace).build();
        assert!(LOGGER.enabled(&debug));
        assert!(!LOGGER.enabled(&trace));

        let line = format_record(
            &Record::builder()
                .args(format_args!("transforming"))
                .level(Level::Debug)
                .target("chacha20block")
                .build(),
        );
        assert_eq!(line, "[DEBUG chacha20block] transforming");
    }
}
