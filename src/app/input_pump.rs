use crossterm::event::{Event, EventStream, KeyEventKind, MouseEventKind};
use futures_util::StreamExt;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;

use crate::event::DomainEvent;

/// Forwards terminal input into the loop's event channel from a tokio task.
/// The sender is shared so the loop can queue its own events behind input.
pub(crate) struct InputPump {
    task: Option<JoinHandle<()>>,
}

impl InputPump {
    pub(crate) fn start() -> (UnboundedSender<DomainEvent>, UnboundedReceiver<DomainEvent>, Self) {
        let (tx, rx) = unbounded_channel();
        let forward = tx.clone();
        let task = tokio::spawn(async move {
            let mut events = EventStream::new();
            while let Some(read) = events.next().await {
                let event = match read {
                    Ok(event) if !worth_waking_for(&event) => continue,
                    Ok(event) => DomainEvent::Input(event),
                    Err(err) => DomainEvent::InputError(err.to_string()),
                };
                if forward.send(event).is_err() {
                    break;
                }
            }
        });
        (tx, rx, Self { task: Some(task) })
    }

    pub(crate) fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Bare pointer motion and key releases never change the screen.
fn worth_waking_for(event: &Event) -> bool {
    match event {
        Event::Mouse(mouse) => mouse.kind != MouseEventKind::Moved,
        Event::Key(key) => key.kind != KeyEventKind::Release,
        Event::FocusGained | Event::FocusLost => false,
        _ => true,
    }
}
