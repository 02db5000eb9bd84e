//! Debounced search box.
//!
//! Keystrokes re-arm a single trailing timer; submit and clear bypass it.
//! Dropping the input tears down any pending timer with it.

use std::{fmt, sync::Arc, time::Duration};

use crate::debounce::DebounceHandle;

/// Quiet period before a typed query is searched.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_secs(1);

pub type SearchCallback = Arc<dyn Fn(String) + Send + Sync>;

pub struct SearchInput {
    text: String,
    delay: Duration,
    timer: DebounceHandle,
    on_search: SearchCallback,
}

impl SearchInput {
    pub fn new<F>(delay: Duration, on_search: F) -> Self
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        Self {
            text: String::new(),
            delay,
            timer: DebounceHandle::new(),
            on_search: Arc::new(on_search),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_pending(&self) -> bool {
        self.timer.is_pending()
    }

    /// Replace the text as if the user typed it.
    ///
    /// Blank text searches for "" right away; anything else is searched once
    /// the input has been quiet for the configured delay.
    pub fn set_text(&mut self, value: impl Into<String>) {
        let value = value.into();
        self.text.clone_from(&value);
        self.timer.cancel();

        if value.trim().is_empty() {
            (self.on_search)(String::new());
        } else {
            let on_search = Arc::clone(&self.on_search);
            self.timer.arm(self.delay, move || on_search(value));
        }
    }

    /// Search the current text immediately. Returns false for blank text.
    pub fn submit(&mut self) -> bool {
        self.timer.cancel();
        if self.text.trim().is_empty() {
            return false;
        }
        (self.on_search)(self.text.clone());
        true
    }

    /// External clear signal: empty the box and search for "".
    pub fn clear(&mut self) {
        self.timer.cancel();
        self.text.clear();
        (self.on_search)(String::new());
    }
}

impl fmt::Debug for SearchInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchInput")
            .field("text", &self.text)
            .field("delay", &self.delay)
            .field("timer", &self.timer)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::time::sleep;

    const DELAY: Duration = SEARCH_DEBOUNCE;

    fn recording_input() -> (SearchInput, Arc<Mutex<Vec<String>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        let input = SearchInput::new(DELAY, move |q| sink.lock().unwrap().push(q));
        (input, calls)
    }

    fn taken(calls: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
        std::mem::take(&mut *calls.lock().unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_keystrokes_searches_last_value_once() {
        let (mut input, calls) = recording_input();

        for partial in ["L", "Lo", "Lon", "Lond", "London"] {
            input.set_text(partial);
            sleep(Duration::from_millis(200)).await;
        }
        assert!(taken(&calls).is_empty());

        sleep(DELAY).await;
        assert_eq!(taken(&calls), vec!["London".to_string()]);
        assert_eq!(input.text(), "London");
    }

    #[tokio::test(start_paused = true)]
    async fn pauses_longer_than_delay_produce_separate_searches() {
        let (mut input, calls) = recording_input();

        input.set_text("Par");
        sleep(Duration::from_millis(1100)).await;
        input.set_text("Paris");
        sleep(Duration::from_millis(1100)).await;

        assert_eq!(taken(&calls), vec!["Par".to_string(), "Paris".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn blank_text_searches_empty_immediately() {
        let (mut input, calls) = recording_input();

        input.set_text("Berlin");
        input.set_text("   ");
        assert_eq!(taken(&calls), vec![String::new()]);

        sleep(Duration::from_secs(3)).await;
        assert!(taken(&calls).is_empty());
        assert_eq!(input.text(), "   ");
    }

    #[tokio::test(start_paused = true)]
    async fn submit_bypasses_timer_with_exact_text() {
        let (mut input, calls) = recording_input();

        input.set_text("  New York ");
        assert!(input.submit());
        assert_eq!(taken(&calls), vec!["  New York ".to_string()]);

        sleep(Duration::from_secs(3)).await;
        assert!(taken(&calls).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn submit_blank_does_nothing() {
        let (mut input, calls) = recording_input();

        assert!(!input.submit());
        input.set_text(" ");
        taken(&calls);
        assert!(!input.submit());
        assert!(taken(&calls).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn clear_resets_text_and_cancels_pending_search() {
        let (mut input, calls) = recording_input();

        input.set_text("Tokyo");
        assert!(input.is_pending());
        input.clear();

        assert_eq!(input.text(), "");
        assert!(!input.is_pending());
        assert_eq!(taken(&calls), vec![String::new()]);

        sleep(Duration::from_secs(3)).await;
        assert!(taken(&calls).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_input_cancels_pending_search() {
        let (mut input, calls) = recording_input();

        input.set_text("Oslo");
        drop(input);

        sleep(Duration::from_secs(3)).await;
        assert!(taken(&calls).is_empty());
    }
}
