use leptos::prelude::*;
use std::time::Duration;

/// How long a toast stays on screen.
pub(crate) const TOAST_TTL: Duration = Duration::from_millis(3500);

/// Oldest toasts are dropped beyond this many.
pub(crate) const MAX_TOASTS: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ToastKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ToastQueue {
    next_id: u64,
    items: Vec<Toast>,
}

impl ToastQueue {
    pub fn push(&mut self, kind: ToastKind, message: String) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.items.push(Toast { id, kind, message });
        if self.items.len() > MAX_TOASTS {
            let overflow = self.items.len() - MAX_TOASTS;
            self.items.drain(..overflow);
        }
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|t| t.id != id);
    }

    pub fn items(&self) -> &[Toast] {
        &self.items
    }
}

/// Queues a toast and schedules its removal.
pub(crate) fn show(toasts: RwSignal<ToastQueue>, kind: ToastKind, message: String) {
    let Some(id) = toasts.try_update(|q| q.push(kind, message)) else {
        return;
    };
    leptos_dom::helpers::set_timeout(
        move || {
            let _ = toasts.try_update(|q| q.dismiss(id));
        },
        TOAST_TTL,
    );
}
