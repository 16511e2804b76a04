use std::collections::HashSet;

use eframe::egui::{Pos2, vec2};

/// Input events from the rendering surface, decoupled from any pointer
/// or widget API so the controller can be driven directly in tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) enum InputEvent {
    PointerEnter(usize),
    PointerMove(Pos2),
    PointerLeave,
    ClickNode(usize),
    ClickBackground,
    Cancel,
}

/// Hover/selection/focus state machine for one graph view.
///
/// Focus mode is represented by `focused` alone: the mode flag the web
/// front-end kept next to the focused id is derived, which makes the
/// "mode set iff a node is focused" invariant structural.
pub(super) struct FocusState {
    node_count: usize,
    hovered: Option<usize>,
    selected: Option<usize>,
    focused: Option<usize>,
    pointer: Option<Pos2>,
}

pub(super) struct TooltipAnchor {
    pub node: usize,
    pub pos: Pos2,
}

impl FocusState {
    pub fn new(node_count: usize) -> Self {
        Self {
            node_count,
            hovered: None,
            selected: None,
            focused: None,
            pointer: None,
        }
    }

    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerEnter(index) => {
                if index < self.node_count {
                    self.hovered = Some(index);
                }
            }
            InputEvent::PointerMove(pos) => {
                self.pointer = Some(pos);
            }
            InputEvent::PointerLeave => {
                self.hovered = None;
                self.pointer = None;
            }
            InputEvent::ClickNode(index) => {
                if index < self.node_count {
                    self.focused = Some(index);
                    self.selected = Some(index);
                }
            }
            InputEvent::ClickBackground | InputEvent::Cancel => {
                self.focused = None;
                self.selected = None;
            }
        }
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    pub fn focus_mode(&self) -> bool {
        self.focused.is_some()
    }

    /// The focused node and its 1-hop neighborhood. `None` means no focus
    /// restriction: everything is visible.
    pub fn visible_set(&self, neighbors: &[Vec<usize>]) -> Option<HashSet<usize>> {
        let focused = self.focused?;
        let mut visible = HashSet::from([focused]);
        if let Some(adjacent) = neighbors.get(focused) {
            visible.extend(adjacent.iter().copied());
        }
        Some(visible)
    }

    /// Hovered node plus a screen anchor offset away from the pointer.
    /// Suppressed entirely while focus mode is active.
    pub fn tooltip(&self) -> Option<TooltipAnchor> {
        if self.focus_mode() {
            return None;
        }
        let node = self.hovered?;
        let pointer = self.pointer?;
        Some(TooltipAnchor {
            node,
            pos: pointer + vec2(14.0, -10.0),
        })
    }
}
