//! In-process transport used by the test-suite and the demo binary.
//!
//! Fragments staged through a [`LoopbackPublisher`] are delivered in FIFO
//! order to the subscription sharing its channel and stream id. Each
//! subscription stamps its own session id on deliveries, mirroring the one
//! session per subscription that the real transport negotiates.

use std::{
    collections::{HashMap, VecDeque},
    num::NonZeroUsize,
    sync::{Arc, Mutex, PoisonError},
};

use super::{ConnectOptions, Subscription, Transport, TransportError};
use crate::fragment::{FragmentFlags, FragmentView, SessionId};

#[derive(Debug)]
struct StagedFragment {
    flags: FragmentFlags,
    payload: Vec<u8>,
}

#[derive(Debug, Default)]
struct Stream {
    queue: VecDeque<StagedFragment>,
    closed: bool,
}

type SharedStream = Arc<Mutex<Stream>>;

fn lock(stream: &SharedStream) -> std::sync::MutexGuard<'_, Stream> {
    stream.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-process transport connection.
#[derive(Debug, Default)]
pub struct LoopbackTransport {
    streams: HashMap<(String, i32), SharedStream>,
    next_session: i32,
    closed: bool,
}

impl LoopbackTransport {
    /// Publisher handle for staging fragments on `channel`/`stream_id`.
    ///
    /// The stream is created on first use, so publishers and subscriptions
    /// may be obtained in either order.
    pub fn publisher(&mut self, channel: &str, stream_id: i32) -> LoopbackPublisher {
        LoopbackPublisher {
            stream: Arc::clone(self.stream(channel, stream_id)),
        }
    }

    fn stream(&mut self, channel: &str, stream_id: i32) -> &SharedStream {
        self.streams
            .entry((channel.to_owned(), stream_id))
            .or_default()
    }
}

impl Transport for LoopbackTransport {
    type Subscription = LoopbackSubscription;

    fn connect(options: &ConnectOptions) -> Result<Self, TransportError> {
        if options.channel.is_empty() {
            return Err(TransportError::Driver("channel must not be empty".into()));
        }
        Ok(Self::default())
    }

    fn add_subscription(
        &mut self,
        channel: &str,
        stream_id: i32,
    ) -> Result<Self::Subscription, TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        let session_id = SessionId::new(self.next_session);
        self.next_session += 1;
        let stream = Arc::clone(self.stream(channel, stream_id));
        Ok(LoopbackSubscription { stream, session_id })
    }

    fn close(&mut self) -> Result<(), TransportError> {
        self.closed = true;
        for stream in self.streams.values() {
            lock(stream).closed = true;
        }
        Ok(())
    }
}

/// Subscription end of a loopback stream.
#[derive(Debug)]
pub struct LoopbackSubscription {
    stream: SharedStream,
    session_id: SessionId,
}

impl LoopbackSubscription {
    /// Session id stamped on this subscription's deliveries.
    #[must_use]
    pub fn session_id(&self) -> SessionId { self.session_id }
}

impl Subscription for LoopbackSubscription {
    fn poll(
        &mut self,
        on_fragment: &mut dyn FnMut(FragmentView<'_>),
        fragment_limit: usize,
    ) -> Result<usize, TransportError> {
        let mut stream = lock(&self.stream);
        if stream.closed && stream.queue.is_empty() {
            return Err(TransportError::Closed);
        }

        let mut delivered = 0;
        while delivered < fragment_limit {
            let Some(staged) = stream.queue.pop_front() else {
                break;
            };
            on_fragment(FragmentView::new(
                self.session_id,
                staged.flags,
                &staged.payload,
            ));
            delivered += 1;
        }
        Ok(delivered)
    }
}

/// Publisher end of a loopback stream.
#[derive(Clone, Debug)]
pub struct LoopbackPublisher {
    stream: SharedStream,
}

impl LoopbackPublisher {
    /// Stage one raw fragment exactly as given.
    pub fn publish_fragment(&self, flags: FragmentFlags, payload: &[u8]) {
        lock(&self.stream).queue.push_back(StagedFragment {
            flags,
            payload: payload.to_vec(),
        });
    }

    /// Stage a whole message, splitting it into flagged fragments of at
    /// most `max_fragment_len` bytes.
    pub fn publish(&self, payload: &[u8], max_fragment_len: NonZeroUsize) {
        if payload.is_empty() {
            self.publish_fragment(FragmentFlags::UNFRAGMENTED, payload);
            return;
        }
        let mut chunks = payload.chunks(max_fragment_len.get()).peekable();
        let mut first = true;
        let mut stream = lock(&self.stream);
        while let Some(chunk) = chunks.next() {
            let last = chunks.peek().is_none();
            let flags = match (first, last) {
                (true, true) => FragmentFlags::UNFRAGMENTED,
                (true, false) => FragmentFlags::BEGIN,
                (false, true) => FragmentFlags::END,
                (false, false) => FragmentFlags::MIDDLE,
            };
            stream.queue.push_back(StagedFragment {
                flags,
                payload: chunk.to_vec(),
            });
            first = false;
        }
    }

    /// Close the stream; the subscription fails once the queue drains.
    pub fn close(&self) { lock(&self.stream).closed = true; }
}
