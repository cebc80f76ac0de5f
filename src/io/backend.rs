//! Process-wide audio output.
//!
//! There is exactly one output stream per process. It is opened lazily by the
//! first playback request, can be suspended and resumed, and stays open until
//! [`shutdown`] or process exit.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::StreamConfig;
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use rtrb::{Consumer, Producer, RingBuffer};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::{
    config::EngineConfig,
    synth::{
        engine::{ClockReading, VoiceSink},
        message::SynthMessage,
        poly::{FrameClock, StrumMixer},
    },
    MAX_BLOCK_SIZE,
};

/*
Audio Thread
============

`cpal::Stream` is not `Send` on every platform, so the stream lives on its own
thread for its whole life. Everything else talks to it through channels:

  caller thread(s)                       "strumkit-audio" thread
  ────────────────                       ───────────────────────
  BACKEND mutex                          owns cpal::Stream
    ├─ Producer<SynthMessage> ─ rtrb ──→ audio callback (StrumMixer)
    ├─ FrameClock ←──────── atomics ──── audio callback
    └─ Sender<Command> ── crossbeam ───→ command loop: play / pause / exit

The BACKEND mutex is only ever taken on the control side. The audio callback
touches nothing but the ring buffer consumer and the clock atomics.

Lifecycle
---------

    Closed ──first request──→ Running ⇄ Suspended
      ↑                          │          │
      └────────── shutdown ──────┴──────────┘

A failed open leaves the backend Closed and is retried on the next request.
*/

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("No audio output devices found")]
    NoDevice,
    #[error("Failed to get default output config: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),
    #[error("Failed to build output stream: {0}")]
    Build(#[from] cpal::BuildStreamError),
    #[error("Failed to start output stream: {0}")]
    Play(#[from] cpal::PlayStreamError),
    #[error("Failed to pause output stream: {0}")]
    Pause(#[from] cpal::PauseStreamError),
    #[error("Failed to spawn audio thread: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("Audio thread is no longer running")]
    ThreadGone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendState {
    Closed,
    Running,
    Suspended,
}

enum Command {
    Resume(Sender<Result<(), BackendError>>),
    Suspend(Sender<Result<(), BackendError>>),
    Shutdown,
}

struct AudioBackend {
    producer: Producer<SynthMessage>,
    clock: FrameClock,
    commands: Sender<Command>,
    sample_rate: f32,
    suspended: bool,
    thread: Option<JoinHandle<()>>,
}

static BACKEND: Mutex<Option<AudioBackend>> = Mutex::new(None);

fn backend() -> MutexGuard<'static, Option<AudioBackend>> {
    BACKEND.lock().unwrap_or_else(PoisonError::into_inner)
}

impl AudioBackend {
    fn open(config: &EngineConfig) -> Result<Self, BackendError> {
        let (producer, consumer) = RingBuffer::<SynthMessage>::new(config.queue_capacity.max(1));
        let clock = FrameClock::new();
        let (command_tx, command_rx) = unbounded();
        let (ready_tx, ready_rx) = bounded(1);

        let thread_clock = clock.clone();
        let voice_limit = config.voice_limit;
        let thread = thread::Builder::new()
            .name("strumkit-audio".into())
            .spawn(move || {
                audio_thread(consumer, thread_clock, voice_limit, ready_tx, command_rx)
            })
            .map_err(BackendError::Spawn)?;

        let sample_rate = ready_rx.recv().map_err(|_| BackendError::ThreadGone)??;

        Ok(Self {
            producer,
            clock,
            commands: command_tx,
            sample_rate,
            suspended: false,
            thread: Some(thread),
        })
    }

    fn request(
        &self,
        command: fn(Sender<Result<(), BackendError>>) -> Command,
    ) -> Result<(), BackendError> {
        let (reply_tx, reply_rx) = bounded(1);
        self.commands
            .send(command(reply_tx))
            .map_err(|_| BackendError::ThreadGone)?;
        reply_rx.recv().map_err(|_| BackendError::ThreadGone)?
    }

    fn resume(&mut self) -> Result<(), BackendError> {
        if self.suspended {
            self.request(Command::Resume)?;
            self.suspended = false;
            info!("audio output resumed");
        }
        Ok(())
    }

    fn suspend(&mut self) -> Result<(), BackendError> {
        if !self.suspended {
            self.request(Command::Suspend)?;
            self.suspended = true;
            info!("audio output suspended");
        }
        Ok(())
    }

    fn close(mut self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("audio thread panicked");
            }
        }
        info!("audio output closed");
    }
}

fn audio_thread(
    consumer: Consumer<SynthMessage>,
    clock: FrameClock,
    voice_limit: Option<usize>,
    ready: Sender<Result<f32, BackendError>>,
    commands: Receiver<Command>,
) {
    let stream = match open_stream(consumer, clock, voice_limit) {
        Ok((stream, sample_rate)) => {
            let _ = ready.send(Ok(sample_rate));
            stream
        }
        Err(err) => {
            let _ = ready.send(Err(err));
            return;
        }
    };

    for command in commands.iter() {
        match command {
            Command::Resume(reply) => {
                let _ = reply.send(stream.play().map_err(BackendError::from));
            }
            Command::Suspend(reply) => {
                let _ = reply.send(stream.pause().map_err(BackendError::from));
            }
            Command::Shutdown => break,
        }
    }

    drop(stream);
    debug!("audio thread exiting");
}

fn open_stream(
    consumer: Consumer<SynthMessage>,
    clock: FrameClock,
    voice_limit: Option<usize>,
) -> Result<(cpal::Stream, f32), BackendError> {
    let host = cpal::default_host();
    let device = host.default_output_device().ok_or(BackendError::NoDevice)?;
    let supported = device.default_output_config()?;

    let sample_rate = supported.sample_rate().0 as f32;
    let channels = (supported.channels() as usize).max(1);

    info!(
        device = %device.name().unwrap_or_default(),
        sample_rate,
        channels,
        "opening audio output"
    );

    let mut mixer = StrumMixer::new(consumer, clock).with_voice_limit(voice_limit);
    let mut mono = vec![0.0f32; MAX_BLOCK_SIZE];
    let config: StreamConfig = supported.into();

    let stream = device.build_output_stream(
        &config,
        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
            for chunk in data.chunks_mut(MAX_BLOCK_SIZE * channels) {
                let frames = chunk.len() / channels;
                let block = &mut mono[..frames];
                mixer.render(block);

                // Copy to output (mono to all channels)
                for (frame, &sample) in chunk.chunks_mut(channels).zip(block.iter()) {
                    frame.fill(sample);
                }
            }
        },
        move |err| error!("audio stream error: {}", err),
        None,
    )?;

    stream.play()?;
    Ok((stream, sample_rate))
}

fn ensure_open<'a>(
    guard: &'a mut MutexGuard<'static, Option<AudioBackend>>,
    config: &EngineConfig,
) -> Result<&'a mut AudioBackend, BackendError> {
    if guard.is_none() {
        **guard = Some(AudioBackend::open(config)?);
    }
    match guard.as_mut() {
        Some(backend) => Ok(backend),
        None => Err(BackendError::ThreadGone),
    }
}

/// Open the output if needed and make sure it is running.
pub fn start(config: &EngineConfig) -> Result<(), BackendError> {
    let mut guard = backend();
    ensure_open(&mut guard, config)?.resume()
}

/// Resume a suspended output. Does nothing when the output is closed.
pub fn resume() -> Result<(), BackendError> {
    match backend().as_mut() {
        Some(backend) => backend.resume(),
        None => Ok(()),
    }
}

/// Pause the output stream without closing it. Sounding voices freeze.
pub fn suspend() -> Result<(), BackendError> {
    match backend().as_mut() {
        Some(backend) => backend.suspend(),
        None => Ok(()),
    }
}

/// Close the output. The next playback request opens it again.
pub fn shutdown() {
    let taken = backend().take();
    if let Some(backend) = taken {
        backend.close();
    }
}

pub fn state() -> BackendState {
    match backend().as_ref() {
        None => BackendState::Closed,
        Some(backend) if backend.suspended => BackendState::Suspended,
        Some(_) => BackendState::Running,
    }
}

/// Voice sink feeding the process-wide output.
///
/// Every sink shares the one stream; the configuration of whichever sink opens
/// it first decides queue capacity and voice limit.
#[derive(Debug, Clone)]
pub struct BackendSink {
    config: EngineConfig,
}

impl BackendSink {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }
}

impl VoiceSink for BackendSink {
    fn clock(&mut self) -> Option<ClockReading> {
        let mut guard = backend();
        let backend = match ensure_open(&mut guard, &self.config) {
            Ok(backend) => backend,
            Err(err) => {
                warn!(%err, "audio output unavailable");
                return None;
            }
        };

        if let Err(err) = backend.resume() {
            warn!(%err, "could not resume audio output");
        }

        // Voices pushed now are seen at the start of the next callback at the
        // earliest, so schedule them one callback ahead.
        Some(ClockReading {
            sample_rate: backend.sample_rate,
            frame: backend.clock.now() + backend.clock.last_block(),
        })
    }

    fn submit(&mut self, message: SynthMessage) -> bool {
        match backend().as_mut() {
            Some(backend) => backend.producer.push(message).is_ok(),
            None => false,
        }
    }
}
