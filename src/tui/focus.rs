//! Focus traversal over container cursors
//!
//! Every container (pane, screen, popup) keeps an independent cursor into
//! its entries. Traversal skips disabled entries, clamps at the ends and
//! reports an overflow when a step leaves the container, which the
//! two-level [`update_focus`] uses to cascade from a pane to its screen.
//!
//! No function here can fail: empty containers and stale cursors always
//! fall back to an inert state.

/// Direction of a traversal step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Prev,
    /// Re-resolve the cursor without moving
    Stay,
    Next,
}

impl Step {
    pub fn delta(self) -> isize {
        match self {
            Step::Prev => -1,
            Step::Stay => 0,
            Step::Next => 1,
        }
    }
}

/// Anything with an ordered set of focusable entries and a cursor
pub trait Container {
    fn len(&self) -> usize;

    fn is_enabled_at(&self, index: usize) -> bool;

    fn cursor(&self) -> usize;

    fn set_cursor(&mut self, cursor: usize);

    /// Set the focus flag of one entry
    fn set_focus_at(&mut self, index: usize, focus: bool);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A container whose entries may themselves be containers
pub trait Composite: Container {
    /// The nested container at `index`, if that entry is one
    fn child_at(&mut self, index: usize) -> Option<&mut dyn Container>;
}

/// Indices of enabled entries, in traversal order
pub fn enabled_indices<C: Container + ?Sized>(container: &C) -> Vec<usize> {
    (0..container.len())
        .filter(|&i| container.is_enabled_at(i))
        .collect()
}

/// Move the cursor without touching focus flags; returns the overflow
fn step_cursor<C: Container + ?Sized>(container: &mut C, step: Step) -> Step {
    let enabled = enabled_indices(container);
    match enabled.as_slice() {
        [] => {
            container.set_cursor(0);
            return step;
        }
        [only] => {
            container.set_cursor(*only);
            return step;
        }
        _ => {}
    }

    let Some(position) = enabled.iter().position(|&i| i == container.cursor()) else {
        // Stale cursor: snap without moving further
        container.set_cursor(enabled[0]);
        return Step::Stay;
    };

    let target = position as isize + step.delta();
    if target < 0 || target >= enabled.len() as isize {
        container.set_cursor(enabled[position]);
        return step;
    }
    container.set_cursor(enabled[target as usize]);
    Step::Stay
}

/// Focus exactly the entry under the cursor (if enabled and `on`)
pub fn apply_focus<C: Container + ?Sized>(container: &mut C, on: bool) {
    let cursor = container.cursor();
    for i in 0..container.len() {
        let focus = on && i == cursor && container.is_enabled_at(i);
        container.set_focus_at(i, focus);
    }
}

/// Advance a flat container by one step and refocus it
///
/// Returns the overflow: `Step::Stay` when the cursor moved (or snapped),
/// the step itself when it could not move in that direction. Containers
/// with fewer than two enabled entries never move and always overflow.
pub fn advance<C: Container + ?Sized>(container: &mut C, step: Step) -> Step {
    let overflow = step_cursor(container, step);
    apply_focus(container, true);
    overflow
}

/// Put the cursor on the first enabled entry
pub fn focus_first<C: Container + ?Sized>(container: &mut C) {
    let first = enabled_indices(container).first().copied().unwrap_or(0);
    container.set_cursor(first);
}

/// Put the cursor on the last enabled entry
pub fn focus_last<C: Container + ?Sized>(container: &mut C) {
    let last = enabled_indices(container).last().copied().unwrap_or(0);
    container.set_cursor(last);
}

/// Two-level traversal: the current child first, then the parent
///
/// Entering a child container from the parent lands on its first enabled
/// entry when moving forward and on its last when moving backward.
/// Focus flags are applied top-down afterwards.
pub fn update_focus<C: Composite + ?Sized>(parent: &mut C, step: Step) -> Step {
    let before = parent.cursor();
    let parent_step = match parent.child_at(before) {
        Some(child) => step_cursor(child, step),
        None => step,
    };

    let overflow = step_cursor(parent, parent_step);
    let after = parent.cursor();

    if let Some(child) = parent.child_at(after) {
        if after != before {
            match parent_step {
                Step::Next => focus_first(child),
                Step::Prev => focus_last(child),
                Step::Stay => {}
            }
        }
        step_cursor(child, Step::Stay);
    }

    apply_focus(parent, true);
    overflow
}

/// Resolve every cursor in place and place focus, without moving
pub fn resolve<C: Composite + ?Sized>(parent: &mut C, focused: bool) {
    for i in 0..parent.len() {
        if let Some(child) = parent.child_at(i) {
            step_cursor(child, Step::Stay);
        }
    }
    step_cursor(parent, Step::Stay);
    apply_focus(parent, focused);
}

/// Reset a composite to its first enabled entry, and that entry's first
pub fn reset<C: Composite + ?Sized>(parent: &mut C, focused: bool) {
    focus_first(parent);
    let cursor = parent.cursor();
    if let Some(child) = parent.child_at(cursor) {
        focus_first(child);
    }
    resolve(parent, focused);
}
