//! Typed reveal of the result message.
//!
//! Each reveal carries a generation token. Starting a new reveal bumps the
//! generation, so a job from an older request sees it is stale and stops.

/// Base delay per character, seconds.
pub const CHAR_DELAY: f32 = 0.045;
/// Extra pause after sentence punctuation.
pub const SENTENCE_PAUSE: f32 = 0.22;
pub const COMMA_PAUSE: f32 = 0.12;

pub fn char_delay(ch: char) -> f32 {
    CHAR_DELAY
        + match ch {
            '.' | '!' | '?' => SENTENCE_PAUSE,
            ',' => COMMA_PAUSE,
            _ => 0.0,
        }
}

#[derive(Debug, Clone)]
struct Job {
    token: u64,
    chars: Vec<char>,
    typed: usize,
    wait: f32,
}

/// State of the reveal after an `advance`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedText {
    pub text: String,
    pub done: bool,
}

#[derive(Debug, Default)]
pub struct Typewriter {
    generation: u64,
    job: Option<Job>,
}

impl Typewriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a reveal, superseding any in flight. The first character appears
    /// immediately. Returns the job's token.
    pub fn start(&mut self, text: &str) -> u64 {
        self.generation += 1;
        let mut job = Job {
            token: self.generation,
            chars: text.chars().collect(),
            typed: 0,
            wait: 0.0,
        };
        Self::type_next(&mut job);
        self.job = Some(job);
        self.generation
    }

    /// Invalidate whatever is running.
    pub fn cancel(&mut self) {
        self.generation += 1;
    }

    pub fn is_current(&self, token: u64) -> bool {
        token == self.generation
    }

    pub fn is_typing(&self) -> bool {
        self.job.as_ref().is_some_and(|j| j.token == self.generation)
    }

    fn type_next(job: &mut Job) -> bool {
        match job.chars.get(job.typed) {
            Some(&ch) => {
                job.typed += 1;
                job.wait += char_delay(ch);
                true
            }
            None => false,
        }
    }

    /// Advance by `dt`. Returns `None` when nothing is running or the running
    /// job went stale.
    pub fn advance(&mut self, dt: f32) -> Option<TypedText> {
        let generation = self.generation;
        let job = self.job.as_mut()?;
        if job.token != generation {
            self.job = None;
            return None;
        }
        job.wait -= dt.max(0.0);
        let mut done = false;
        while job.wait <= 0.0 {
            if !Self::type_next(job) {
                done = true;
                break;
            }
        }
        let text: String = job.chars[..job.typed].iter().collect();
        if done {
            self.job = None;
        }
        Some(TypedText { text, done })
    }
}
