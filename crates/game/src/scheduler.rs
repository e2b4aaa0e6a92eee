//! Frame-delta driven deferred tasks.
//!
//! Delays count down with the simulation delta, so they pause whenever frames
//! stop arriving.

#[derive(Debug, Clone)]
struct Pending<T> {
    remaining: f32,
    task: T,
}

#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    pending: Vec<Pending<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self { pending: Vec::new() }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, delay: f32, task: T) {
        let remaining = if delay.is_finite() { delay.max(0.0) } else { 0.0 };
        self.pending.push(Pending { remaining, task });
    }

    /// Advance every countdown and return the tasks that came due, earliest first.
    /// Tasks due at the same moment keep their scheduling order.
    pub fn advance(&mut self, dt: f32) -> Vec<T> {
        let dt = dt.max(0.0);
        for p in &mut self.pending {
            p.remaining -= dt;
        }
        let (mut due, rest): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.pending).into_iter().partition(|p| p.remaining <= 0.0);
        self.pending = rest;
        due.sort_by(|a, b| a.remaining.total_cmp(&b.remaining));
        due.into_iter().map(|p| p.task).collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_due_order() {
        let mut s = Scheduler::new();
        s.schedule(3.0, "result");
        s.schedule(1.0, "fade");
        assert!(s.advance(0.5).is_empty());
        assert_eq!(s.advance(0.6), vec!["fade"]);
        assert_eq!(s.len(), 1);
        assert_eq!(s.advance(5.0), vec!["result"]);
        assert!(s.is_empty());
    }

    #[test]
    fn zero_delay_fires_on_next_advance() {
        let mut s = Scheduler::new();
        s.schedule(0.0, 1);
        s.schedule(f32::NAN, 2);
        assert_eq!(s.advance(0.0), vec![1, 2]);
    }

    #[test]
    fn overshoot_orders_by_deadline() {
        let mut s = Scheduler::new();
        s.schedule(2.0, 'b');
        s.schedule(1.0, 'a');
        assert_eq!(s.advance(10.0), vec!['a', 'b']);
    }
}
