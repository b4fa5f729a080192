//! Delayed-effect queue.
//!
//! Ripple and click-burst ignitions fire after per-cell delays. Instead of
//! leaning on a host timer primitive, entries are queued against the virtual
//! session clock and drained by the frame scheduler each tick, which keeps
//! the core testable without wall-clock waits. Every entry carries its
//! effect category so reset events can cancel per effect.

use smallvec::SmallVec;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectKind {
    Ripple,
    ClickBurst,
}

#[derive(Clone, Copy, Debug)]
pub enum EffectAction {
    Ignite { cell: u32, intensity: f32 },
    IgniteAndScatter { cell: u32, intensity: f32 },
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    fire_at_ms: f64,
    seq: u64,
    kind: EffectKind,
    action: EffectAction,
}

// Ordered so that BinaryHeap (a max-heap) pops the earliest entry; `seq`
// keeps same-instant entries in schedule order.
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .fire_at_ms
            .total_cmp(&self.fire_at_ms)
            .then(other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

#[derive(Default)]
pub struct EffectTimers {
    entries: BinaryHeap<Entry>,
    seq: u64,
}

impl EffectTimers {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn schedule(&mut self, fire_at_ms: f64, kind: EffectKind, action: EffectAction) {
        self.seq += 1;
        self.entries.push(Entry {
            fire_at_ms,
            seq: self.seq,
            kind,
            action,
        });
    }

    /// Pop every entry due at `now_ms`, in fire order.
    pub fn drain_due(&mut self, now_ms: f64, out: &mut SmallVec<[EffectAction; 16]>) {
        while self.entries.peek().map_or(false, |e| e.fire_at_ms <= now_ms) {
            if let Some(e) = self.entries.pop() {
                out.push(e.action);
            }
        }
    }

    /// Drop all pending entries of one effect category.
    pub fn cancel(&mut self, kind: EffectKind) {
        let kept: Vec<Entry> = self
            .entries
            .drain()
            .filter(|e| e.kind != kind)
            .collect();
        self.entries = kept.into();
    }

    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }
}
