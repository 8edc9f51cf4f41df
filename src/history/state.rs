use std::collections::VecDeque;

use tracing::debug;

use crate::event::{AppEvent, ViewKind};

use super::location::format_location;

const HISTORY_CAPACITY: usize = 64;

/// Push/back/forward stack of hero positions, one entry per `?image=N` write.
#[derive(Debug, Default)]
pub struct LocationHistory {
    back_stack: VecDeque<usize>,
    forward_stack: VecDeque<usize>,
    current: Option<usize>,
    pending_restore: Option<Restore>,
}

/// A back/forward step whose load has not completed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Restore {
    target: usize,
    displaced: Option<usize>,
    toward: Traversal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Traversal {
    Back,
    Forward,
}

impl LocationHistory {
    /// Steps back when `go_to` accepts the target. Arrival at the target is
    /// not recorded again; a failed or superseded load puts the step back.
    pub fn back(&mut self, go_to: impl FnOnce(usize) -> bool) -> Option<usize> {
        self.traverse(Traversal::Back, go_to)
    }

    pub fn forward(&mut self, go_to: impl FnOnce(usize) -> bool) -> Option<usize> {
        self.traverse(Traversal::Forward, go_to)
    }

    fn traverse(&mut self, toward: Traversal, go_to: impl FnOnce(usize) -> bool) -> Option<usize> {
        self.cancel_restore();
        let displaced = self.current;
        let (from, to) = self.stacks(toward);
        let target = *from.back()?;
        if !go_to(target) {
            return None;
        }
        from.pop_back();
        if let Some(current) = displaced {
            push_bounded(to, current);
        }
        self.pending_restore = Some(Restore {
            target,
            displaced,
            toward,
        });
        Some(target)
    }

    /// Source and destination stacks of a step in `toward`.
    fn stacks(&mut self, toward: Traversal) -> (&mut VecDeque<usize>, &mut VecDeque<usize>) {
        match toward {
            Traversal::Back => (&mut self.back_stack, &mut self.forward_stack),
            Traversal::Forward => (&mut self.forward_stack, &mut self.back_stack),
        }
    }

    fn cancel_restore(&mut self) {
        let Some(restore) = self.pending_restore.take() else {
            return;
        };
        let (from, to) = self.stacks(restore.toward);
        if restore.displaced.is_some() {
            to.pop_back();
        }
        push_bounded(from, restore.target);
        debug!(position = restore.target, "history step undone");
    }

    pub fn on_event(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Navigated {
                view: ViewKind::Hero,
                to,
                ..
            } => self.record(*to),
            AppEvent::LoadFailed {
                view: ViewKind::Hero,
                ..
            } => self.cancel_restore(),
            _ => {}
        }
    }

    /// Records a completed hero navigation. Recording truncates the forward stack.
    pub fn record(&mut self, position: usize) {
        if let Some(restore) = self.pending_restore
            && restore.target == position
        {
            self.pending_restore = None;
            self.current = Some(position);
            return;
        }
        self.cancel_restore();
        if let Some(previous) = self.current
            && previous != position
        {
            push_bounded(&mut self.back_stack, previous);
            self.forward_stack.clear();
        }
        self.current = Some(position);
        debug!(location = %format_location(position), "location pushed");
    }

    pub fn location(&self) -> Option<String> {
        self.current.map(format_location)
    }

    pub fn can_go_back(&self) -> bool {
        !self.back_stack.is_empty()
    }

    pub fn can_go_forward(&self) -> bool {
        !self.forward_stack.is_empty()
    }
}

fn push_bounded(stack: &mut VecDeque<usize>, position: usize) {
    if stack.len() >= HISTORY_CAPACITY {
        stack.pop_front();
    }
    stack.push_back(position);
}
