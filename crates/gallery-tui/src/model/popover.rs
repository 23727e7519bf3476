/// Whether the count-entry popover is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopoverState {
    #[default]
    Closed,
    Open,
}

/// Longest count the popover accepts, in digits.
const MAX_DIGITS: usize = 9;

/// The "select N artworks" popover attached to the Title column header.
///
/// Closed → Open on the disclosure key. Submitting a valid count closes it
/// and clears the entry; submitting an invalid one changes nothing.
#[derive(Debug, Clone, Default)]
pub struct CountPopover {
    pub state: PopoverState,
    pub buffer: String,
}

impl CountPopover {
    pub fn is_open(&self) -> bool {
        self.state == PopoverState::Open
    }

    /// Disclosure control: open when closed, close when open. The entered
    /// count survives closing, like a form that is merely hidden.
    pub fn toggle(&mut self) {
        self.state = match self.state {
            PopoverState::Closed => PopoverState::Open,
            PopoverState::Open => PopoverState::Closed,
        };
    }

    pub fn push_digit(&mut self, c: char) {
        if !self.is_open() || !c.is_ascii_digit() || self.buffer.len() >= MAX_DIGITS {
            return;
        }
        if self.buffer == "0" {
            self.buffer.clear();
        }
        self.buffer.push(c);
    }

    pub fn backspace(&mut self) {
        if self.is_open() {
            self.buffer.pop();
        }
    }

    /// The entered count if it is within `1..=max`.
    pub fn valid_count(&self, max: usize) -> Option<usize> {
        let n: usize = self.buffer.parse().ok()?;
        (1..=max).contains(&n).then_some(n)
    }

    /// Submit the entry. A valid count closes the popover, clears the entry
    /// and is returned; anything else leaves the popover untouched.
    pub fn submit(&mut self, max: usize) -> Option<usize> {
        if !self.is_open() {
            return None;
        }
        let n = self.valid_count(max)?;
        self.state = PopoverState::Closed;
        self.buffer.clear();
        Some(n)
    }
}
