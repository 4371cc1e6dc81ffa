use chrono::Local;
use ringbuffer::{AllocRingBuffer, RingBuffer};
use std::sync::{Arc, Mutex, MutexGuard};
use snake_common::games::snake::GameSnapshot;
use snake_common::log;
use snake_common::session::{AudioCue, AudioSink, RenderSink};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Slot shared between the tick loop thread and the UI thread.
pub struct SharedState {
    snapshot: Arc<Mutex<Option<GameSnapshot>>>,
    event_log: Arc<Mutex<AllocRingBuffer<String>>>,
    repaint: Arc<Mutex<Option<egui::Context>>>,
}

impl SharedState {
    pub fn new(event_log_size: usize) -> Self {
        Self {
            snapshot: Arc::new(Mutex::new(None)),
            event_log: Arc::new(Mutex::new(AllocRingBuffer::new(event_log_size))),
            repaint: Arc::new(Mutex::new(None)),
        }
    }

    pub fn set_snapshot(&self, snapshot: GameSnapshot) {
        *lock(&self.snapshot) = Some(snapshot);
        self.request_repaint();
    }

    pub fn get_snapshot(&self) -> Option<GameSnapshot> {
        lock(&self.snapshot).clone()
    }

    pub fn add_event(&self, event: String) {
        let line = format!("[{}] {}", Local::now().format("%H:%M:%S"), event);
        lock(&self.event_log).enqueue(line);
        self.request_repaint();
    }

    /// Newest first.
    pub fn get_events(&self) -> Vec<String> {
        let event_log = lock(&self.event_log);
        let mut events: Vec<String> = event_log.iter().cloned().collect();
        events.reverse();
        events
    }

    /// Lets the tick loop wake the UI after every snapshot.
    pub fn set_repaint_context(&self, ctx: egui::Context) {
        *lock(&self.repaint) = Some(ctx);
    }

    fn request_repaint(&self) {
        if let Some(ctx) = lock(&self.repaint).as_ref() {
            ctx.request_repaint();
        }
    }
}

impl Clone for SharedState {
    fn clone(&self) -> Self {
        Self {
            snapshot: Arc::clone(&self.snapshot),
            event_log: Arc::clone(&self.event_log),
            repaint: Arc::clone(&self.repaint),
        }
    }
}

/// Publishes every snapshot into the shared slot.
pub struct SharedRender {
    shared_state: SharedState,
}

impl SharedRender {
    pub fn new(shared_state: SharedState) -> Self {
        Self { shared_state }
    }
}

impl RenderSink for SharedRender {
    fn render(&mut self, snapshot: &GameSnapshot) {
        self.shared_state.set_snapshot(snapshot.clone());
    }
}

/// No sound backend: cues are logged and shown in the event panel.
pub struct EventLogAudio {
    shared_state: SharedState,
}

impl EventLogAudio {
    pub fn new(shared_state: SharedState) -> Self {
        Self { shared_state }
    }
}

fn describe_cue(cue: AudioCue) -> String {
    match cue {
        AudioCue::FoodEaten => "Food eaten".to_string(),
        AudioCue::PowerUpCollected(kind) => format!("{} collected", kind.label()),
        AudioCue::GameOver => "Game over".to_string(),
        AudioCue::RunStarted => "Run started".to_string(),
        AudioCue::RunStopped => "Run stopped".to_string(),
    }
}

impl AudioSink for EventLogAudio {
    fn play(&mut self, cue: AudioCue) {
        let description = describe_cue(cue);
        log!("Cue: {}", description);
        self.shared_state.add_event(description);
    }
}
