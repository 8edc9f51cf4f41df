use std::time::{Duration, Instant};

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::time::{self, Interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::command::{ActionId, CommandEffect, CommandOutcome};
use crate::error::AppResult;
use crate::event::{DomainEvent, ViewKind};
use crate::gallery::{LoadSlot, LoadWorker};

use super::core::App;
use super::input_pump::InputPump;
use super::redraw::RedrawPacer;
use super::state::Screen;
use super::terminal_session::TerminalSession;
use super::view_ops::RenderFramePlan;

/// Upper bound on how late a due autoplay advance fires. The carousel keeps
/// the real interval.
const AUTOPLAY_CHECK_INTERVAL: Duration = Duration::from_millis(250);

/// Everything the loop owns for the lifetime of one terminal session.
struct LoopHandles {
    session: TerminalSession,
    pacer: RedrawPacer,
    poll_idle: Duration,
    poll_busy: Duration,
    autoplay: Interval,
    frames: Interval,
    events_tx: UnboundedSender<DomainEvent>,
    events_rx: UnboundedReceiver<DomainEvent>,
    input: InputPump,
}

impl LoopHandles {
    /// Queues an event behind whatever is already waiting.
    fn post(&self, event: DomainEvent) {
        let _ = self.events_tx.send(event);
    }

    fn close(&mut self) -> AppResult<()> {
        self.input.stop();
        self.session.restore()?;
        Ok(())
    }
}

pub(crate) fn select_input_poll_timeout(
    busy: bool,
    idle_timeout: Duration,
    busy_timeout: Duration,
) -> Duration {
    if busy { busy_timeout } else { idle_timeout }
}

fn ticking(period: Duration, delay_first: bool) -> Interval {
    let mut interval = if delay_first {
        time::interval_at(time::Instant::now() + period, period)
    } else {
        time::interval(period)
    };
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

impl App {
    /// Enters the terminal, starts the hero at `location` and runs until quit.
    pub async fn run(&mut self, location: &str) -> AppResult<()> {
        let mut handles = self.open_loop()?;
        self.start(location);

        loop {
            let now = Instant::now();
            let changed = self.drain_background(now);
            let presenter_pending = self.draw_if_needed(&mut handles, changed, now)?;

            let timeout = self.wake_timeout(&handles, presenter_pending, Instant::now());
            let event = next_event(
                &mut handles.events_rx,
                &mut self.loads.worker,
                &mut handles.autoplay,
                &mut handles.frames,
                timeout,
            )
            .await;
            let Some(event) = event else {
                break;
            };
            self.handle_event(event, &mut handles)?;
        }

        handles.close()
    }

    fn open_loop(&mut self) -> AppResult<LoopHandles> {
        let runtime = &self.config.runtime;
        let frame_interval = Duration::from_millis(runtime.pending_redraw_interval_ms.max(1));
        let poll_idle = Duration::from_millis(runtime.input_poll_timeout_idle_ms);
        let poll_busy = Duration::from_millis(runtime.input_poll_timeout_busy_ms);
        let autoplay_check = Duration::from_millis(self.config.navigation.autoplay_interval_ms.max(1))
            .min(AUTOPLAY_CHECK_INTERVAL);

        let session = TerminalSession::enter()?;
        self.render.presenter.initialize_terminal()?;
        let (events_tx, events_rx, input) = InputPump::start();

        Ok(LoopHandles {
            session,
            pacer: RedrawPacer::new(Instant::now(), frame_interval),
            poll_idle,
            poll_busy,
            autoplay: ticking(autoplay_check, true),
            frames: ticking(frame_interval, false),
            events_tx,
            events_rx,
            input,
        })
    }

    fn quit_now(handles: &mut LoopHandles) -> ! {
        info!("quit requested");
        let _ = handles.close();
        std::process::exit(0);
    }

    /// Polls extensions, the presenter and queued palette requests. True when
    /// any of them changed what is on screen.
    fn drain_background(&mut self, now: Instant) -> bool {
        let extensions = self.interaction.drain_background_events(&mut self.state);
        let presenter = self.render.presenter.drain_background_events();
        let palette = self.interaction.apply_palette_requests(&mut self.state);
        // A snap-back that just finished still owes one frame at rest.
        let settled = self.state.drag.is_snapping_back() && !self.state.drag.tick(now);
        extensions || presenter || palette || settled
    }

    /// Crossfades, drags, snap-backs and the hero drift all need frames without input.
    fn is_animating(&self, now: Instant) -> bool {
        let drag = &self.state.drag;
        if drag.is_dragging() || drag.is_snapping_back() {
            return true;
        }
        let Some(view) = self.state.active_view() else {
            return false;
        };
        let layers = self.state.navigator(view).layers();
        layers.fading(now)
            || (view == ViewKind::Hero
                && self.config.navigation.ken_burns
                && layers.visible().frame.is_some())
    }

    /// Returns whether the presenter still has encodes in flight.
    fn draw_if_needed(
        &mut self,
        handles: &mut LoopHandles,
        changed: bool,
        now: Instant,
    ) -> AppResult<bool> {
        let animating = self.is_animating(now) || self.render.presenter.has_pending_work();
        if changed || handles.pacer.animation_frame_due(animating, now) {
            handles.pacer.mark();
        }
        if !handles.pacer.is_dirty() {
            return Ok(self.render.presenter.has_pending_work());
        }

        let plan = RenderFramePlan {
            palette_view: self.interaction.palette_view(),
            preview: self.neighbor_preview(now),
            now,
        };
        let pending = self
            .render
            .render_frame(&mut self.state, &mut handles.session, plan)?;
        handles.pacer.drawn(now);
        Ok(pending)
    }

    fn wake_timeout(&self, handles: &LoopHandles, presenter_pending: bool, now: Instant) -> Duration {
        let busy = presenter_pending
            || self.loads.worker.in_flight_len() > 0
            || self.is_animating(now);
        let timeout = select_input_poll_timeout(busy, handles.poll_idle, handles.poll_busy);
        self.state
            .notices
            .next_deadline()
            .map_or(timeout, |deadline| {
                timeout.min(deadline.saturating_duration_since(now))
            })
    }

    fn handle_event(
        &mut self,
        event: DomainEvent,
        handles: &mut LoopHandles,
    ) -> AppResult<()> {
        let now = Instant::now();
        match event {
            DomainEvent::Input(input) => {
                let outcome =
                    self.handle_input_event(input, &mut handles.session, handles.pacer.dirty_flag(), now)?;
                if outcome.quit_requested {
                    Self::quit_now(handles);
                }
                if let Some(command) = outcome.command {
                    handles.post(DomainEvent::Command(command));
                }
            }
            DomainEvent::InputError(message) => {
                self.state.status.last_action_id = Some(ActionId::Input);
                self.state.status.message = format!("input error: {message}");
                handles.pacer.mark();
            }
            DomainEvent::Command(command) => {
                debug!(?command, "dispatching command");
                let dispatch = self.interaction.dispatch_command(&mut self.state, command)?;
                for app_event in dispatch.emitted_events {
                    handles.post(DomainEvent::App(app_event));
                }
                self.interaction.apply_palette_requests(&mut self.state);
                self.apply_effects(dispatch.effects);
                if dispatch.outcome == CommandOutcome::QuitRequested {
                    Self::quit_now(handles);
                }
                handles.pacer.mark();
            }
            DomainEvent::App(app_event) => {
                self.interaction.handle_app_event(&mut self.state, &app_event);
                handles.pacer.mark();
            }
            DomainEvent::LoadComplete(completed) => {
                for app_event in self.handle_load_result(completed, now) {
                    handles.post(DomainEvent::App(app_event));
                }
                handles.pacer.mark();
            }
            DomainEvent::AutoplayTick => self.autoplay_tick(now),
            DomainEvent::RedrawTick if self.is_animating(now) => handles.pacer.mark(),
            DomainEvent::RedrawTick | DomainEvent::Wake => {}
        }
        Ok(())
    }

    /// Advances the hero when its interval is due. Paused off the hero screen
    /// and while a drag is in progress.
    fn autoplay_tick(&mut self, now: Instant) {
        if self.state.screen != Screen::Hero || self.state.drag.is_dragging() {
            return;
        }
        let Some(request) = self.state.hero.autoplay_tick(now) else {
            return;
        };
        self.state.status.last_action_id = Some(ActionId::Autoplay);
        self.apply_effects(vec![CommandEffect::Load {
            slot: LoadSlot::Hero,
            request,
        }]);
    }
}

/// Waits for the next thing to do. Queued events win over load results, which
/// win over timers. None once the event channel or the load worker is gone.
async fn next_event(
    events_rx: &mut UnboundedReceiver<DomainEvent>,
    load_worker: &mut LoadWorker,
    autoplay: &mut Interval,
    frames: &mut Interval,
    wake_after: Duration,
) -> Option<DomainEvent> {
    tokio::select! {
        biased;
        event = events_rx.recv() => event,
        result = load_worker.recv_result() => result.map(DomainEvent::LoadComplete),
        _ = autoplay.tick() => Some(DomainEvent::AutoplayTick),
        _ = frames.tick() => Some(DomainEvent::RedrawTick),
        _ = time::sleep(wake_after) => Some(DomainEvent::Wake),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::select_input_poll_timeout;

    #[test]
    fn busy_loop_polls_with_short_timeout() {
        let idle = Duration::from_millis(250);
        let busy = Duration::from_millis(16);
        assert_eq!(select_input_poll_timeout(true, idle, busy), busy);
        assert_eq!(select_input_poll_timeout(false, idle, busy), idle);
    }
}
