//! Controller event notifications
//!
//! Events are parameterless notifications for audio, haptics, and animation
//! collaborators. They are broadcast synchronously, on the ticking thread, to
//! every registered [`EventListener`]; ordering among listeners is unspecified.

use std::fmt;

/// Something noteworthy that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerEvent {
    /// Ground contact regained
    Landed,
    /// Ground jump executed
    Jumped,
    StartedWallRunLeft,
    StartedWallRunRight,
    /// Wall jump off a wall on the character's left
    LeftWallJump,
    /// Wall jump off a wall on the character's right
    RightWallJump,
    /// Ledge detected, mantle traversal started
    Mantle,
    MantleFinished,
    StartedSliding,
    StoppedSliding,
    StartedWallClimbing,
    StoppedWallClimbing,
    /// Thrown by a launch pad
    Launched,
    /// Fell below the kill height and was returned to the checkpoint
    Respawned,
}

impl fmt::Display for ControllerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ControllerEvent::Landed => "landed",
            ControllerEvent::Jumped => "jumped",
            ControllerEvent::StartedWallRunLeft => "started wall-run (left)",
            ControllerEvent::StartedWallRunRight => "started wall-run (right)",
            ControllerEvent::LeftWallJump => "wall jump (left)",
            ControllerEvent::RightWallJump => "wall jump (right)",
            ControllerEvent::Mantle => "mantle",
            ControllerEvent::MantleFinished => "mantle finished",
            ControllerEvent::StartedSliding => "started sliding",
            ControllerEvent::StoppedSliding => "stopped sliding",
            ControllerEvent::StartedWallClimbing => "started wall climb",
            ControllerEvent::StoppedWallClimbing => "stopped wall climb",
            ControllerEvent::Launched => "launched",
            ControllerEvent::Respawned => "respawned",
        };
        f.write_str(name)
    }
}

/// Receives controller events.
pub trait EventListener {
    fn on_event(&mut self, event: ControllerEvent);
}

/// Blanket implementation so closures can be used as listeners.
impl<F: FnMut(ControllerEvent)> EventListener for F {
    fn on_event(&mut self, event: ControllerEvent) {
        (self)(event);
    }
}

/// Fan-out of events to zero or more listeners.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Box<dyn EventListener>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for all future events.
    pub fn subscribe<L: EventListener + 'static>(&mut self, listener: L) {
        self.listeners.push(Box::new(listener));
    }

    /// Deliver one event to every listener.
    pub fn publish(&mut self, event: ControllerEvent) {
        for listener in &mut self.listeners {
            listener.on_event(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn closure_listener() {
        let received = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();

        let sink = received.clone();
        bus.subscribe(move |event: ControllerEvent| sink.borrow_mut().push(event));

        bus.publish(ControllerEvent::Jumped);
        bus.publish(ControllerEvent::Landed);
        assert_eq!(
            *received.borrow(),
            vec![ControllerEvent::Jumped, ControllerEvent::Landed]
        );
    }

    #[test]
    fn every_listener_receives() {
        let count = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();

        for _ in 0..3 {
            let count = count.clone();
            bus.subscribe(move |_: ControllerEvent| *count.borrow_mut() += 1);
        }

        bus.publish(ControllerEvent::Mantle);
        assert_eq!(*count.borrow(), 3);
        assert_eq!(bus.len(), 3);
    }

    #[test]
    fn empty_bus_is_fine() {
        let mut bus = EventBus::new();
        assert!(bus.is_empty());
        bus.publish(ControllerEvent::Respawned);
    }
}
