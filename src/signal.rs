//! Environment signals and listener bookkeeping.
//!
//! Hosts turn platform events into [`Signal`]s. A signal only reaches the
//! driver while a listener for its kind is registered, so teardown is just
//! removing the listeners.

/// An event from the environment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Signal {
    /// The viewport changed size, in physical pixels.
    Resize { width: u32, height: u32 },
    /// The pointer moved, in physical pixels from the top-left corner.
    PointerMove { x: f32, y: f32 },
}

impl Signal {
    pub fn kind(&self) -> SignalKind {
        match self {
            Signal::Resize { .. } => SignalKind::Resize,
            Signal::PointerMove { .. } => SignalKind::PointerMove,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Resize,
    PointerMove,
}

/// Handle for a registered listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Registered listeners of a host.
#[derive(Debug, Default)]
pub struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, SignalKind)>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: SignalKind) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, kind));
        id
    }

    /// Returns `false` if `id` was not registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub fn is_listening(&self, kind: SignalKind) -> bool {
        self.entries.iter().any(|(_, k)| *k == kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_remove() {
        let mut listeners = Listeners::new();
        let resize = listeners.add(SignalKind::Resize);
        let pointer = listeners.add(SignalKind::PointerMove);

        assert_eq!(listeners.len(), 2);
        assert!(listeners.is_listening(SignalKind::Resize));

        assert!(listeners.remove(resize));
        assert!(!listeners.remove(resize));
        assert!(!listeners.is_listening(SignalKind::Resize));
        assert!(listeners.is_listening(SignalKind::PointerMove));

        listeners.remove(pointer);
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_signal_kind() {
        assert_eq!(Signal::Resize { width: 1, height: 1 }.kind(), SignalKind::Resize);
        assert_eq!(Signal::PointerMove { x: 0.0, y: 0.0 }.kind(), SignalKind::PointerMove);
    }
}
