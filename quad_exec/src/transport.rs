//! # Transport
//!
//! Frames produced by the control loop leave the process through a
//! `Transport`. Sends never block the tick: a link transport queues frames to
//! a background writer thread and drops them if the queue is full.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::io::Write;
use std::net::TcpStream;
use std::sync::{Arc, Mutex, mpsc::{self, Receiver, SyncSender, TrySendError}};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use log::{debug, info, warn};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Timeout of blocking writes to the serial port.
const SERIAL_TIMEOUT: Duration = Duration::from_millis(100);

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A sink for wire frames.
pub trait Transport: Send {
    /// The protocol the other end of the link speaks, or `None` if there is
    /// nothing connected.
    fn protocol(&self) -> Option<Protocol>;

    /// Send a frame. Failures are not reported to the caller.
    fn send(&mut self, frame: &str);
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Protocol {
    /// Servo bus frames, joint positions are sent every tick.
    Servo,

    /// Remote controller frames, only the operator's commands are sent.
    Remote
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Could not open the serial port {0}: {1}")]
    SerialOpen(String, serialport::Error),

    #[error("Could not connect to {0}: {1}")]
    Connect(String, std::io::Error),

    #[error("Could not start the link writer thread: {0}")]
    ThreadSpawn(std::io::Error)
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A transport over a byte stream, written from a background thread.
pub struct LinkTransport {
    protocol: Protocol,
    tx: Option<SyncSender<String>>,
    bg_jh: Option<JoinHandle<()>>
}

/// A transport with nothing connected.
#[derive(Debug, Default)]
pub struct NullTransport;

/// A transport which keeps every frame it is sent.
#[derive(Debug, Clone)]
pub struct RecordingTransport {
    protocol: Option<Protocol>,
    frames: Arc<Mutex<Vec<String>>>
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl LinkTransport {
    /// Open a servo bus link on a serial port.
    pub fn serial(device: &str, baud: u32, queue_depth: usize) -> Result<Self, TransportError> {
        let port = serialport::new(device, baud)
            .timeout(SERIAL_TIMEOUT)
            .open()
            .map_err(|e| TransportError::SerialOpen(device.into(), e))?;

        info!("Opened servo link on {} at {} baud", device, baud);

        Self::from_writer(Protocol::Servo, port, queue_depth, false)
    }

    /// Connect a remote controller link over TCP.
    pub fn network(endpoint: &str, queue_depth: usize) -> Result<Self, TransportError> {
        let stream = TcpStream::connect(endpoint)
            .map_err(|e| TransportError::Connect(endpoint.into(), e))?;
        stream.set_nodelay(true)
            .map_err(|e| TransportError::Connect(endpoint.into(), e))?;

        info!("Connected remote link to {}", endpoint);

        Self::from_writer(Protocol::Remote, stream, queue_depth, false)
    }

    /// Print frames to stdout, one per line.
    pub fn stdout(protocol: Protocol, queue_depth: usize) -> Result<Self, TransportError> {
        Self::from_writer(protocol, std::io::stdout(), queue_depth, true)
    }

    /// Start a link over any writer.
    ///
    /// If `newline` is set each frame's terminator is replaced by a newline.
    pub fn from_writer<W>(
        protocol: Protocol,
        writer: W,
        queue_depth: usize,
        newline: bool
    ) -> Result<Self, TransportError>
    where
        W: Write + Send + 'static
    {
        let (tx, rx) = mpsc::sync_channel(queue_depth);

        let bg_jh = thread::Builder::new()
            .name("link-writer".into())
            .spawn(move || bg_thread(rx, writer, newline))
            .map_err(TransportError::ThreadSpawn)?;

        Ok(Self {
            protocol,
            tx: Some(tx),
            bg_jh: Some(bg_jh)
        })
    }
}

impl Transport for LinkTransport {
    fn protocol(&self) -> Option<Protocol> {
        Some(self.protocol)
    }

    fn send(&mut self, frame: &str) {
        let tx = match self.tx {
            Some(ref tx) => tx,
            None => return
        };

        match tx.try_send(frame.to_string()) {
            Ok(()) => (),
            Err(TrySendError::Full(f)) => 
                debug!("Link queue full, dropped {:?}", f),
            Err(TrySendError::Disconnected(f)) => 
                debug!("Link writer has stopped, dropped {:?}", f)
        }
    }
}

impl Drop for LinkTransport {
    fn drop(&mut self) {
        // Closing the channel stops the writer once the queue is drained
        self.tx.take();

        if let Some(jh) = self.bg_jh.take() {
            if jh.join().is_err() {
                warn!("Link writer thread panicked");
            }
        }
    }
}

impl Transport for NullTransport {
    fn protocol(&self) -> Option<Protocol> {
        None
    }

    fn send(&mut self, _frame: &str) {}
}

impl RecordingTransport {
    pub fn new(protocol: Option<Protocol>) -> Self {
        Self {
            protocol,
            frames: Arc::new(Mutex::new(Vec::new()))
        }
    }

    /// Get a copy of the frames sent so far.
    pub fn frames(&self) -> Vec<String> {
        match self.frames.lock() {
            Ok(f) => f.clone(),
            Err(_) => Vec::new()
        }
    }

    /// Forget all frames sent so far.
    pub fn clear(&self) {
        if let Ok(mut f) = self.frames.lock() {
            f.clear();
        }
    }
}

impl Transport for RecordingTransport {
    fn protocol(&self) -> Option<Protocol> {
        self.protocol
    }

    fn send(&mut self, frame: &str) {
        if let Ok(mut f) = self.frames.lock() {
            f.push(frame.to_string());
        }
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Background thread, writes queued frames to the link until the channel is
/// closed.
fn bg_thread<W: Write>(rx: Receiver<String>, mut writer: W, newline: bool) {
    for frame in rx.iter() {
        let bytes = match newline {
            true => format!("{}\n", frame.trim_end()),
            false => frame
        };

        if let Err(e) = writer.write_all(bytes.as_bytes()).and_then(|_| writer.flush()) {
            warn!("Could not write frame to the link: {}", e);
        }
    }

    debug!("Link writer stopped");
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_link_writes_frames_in_order() {
        let buf = SharedBuf::default();

        {
            let mut link = LinkTransport::from_writer(
                Protocol::Servo, buf.clone(), 64, false
            ).unwrap();
            assert_eq!(link.protocol(), Some(Protocol::Servo));

            link.send("#11D0\r");
            link.send("#12D-600\r");
        }

        let written = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert_eq!(written, "#11D0\r#12D-600\r");
    }

    #[test]
    fn test_newline_framing() {
        let buf = SharedBuf::default();

        {
            let mut link = LinkTransport::from_writer(
                Protocol::Remote, buf.clone(), 8, true
            ).unwrap();
            link.send("#100M0V0\r");
        }

        let written = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert_eq!(written, "#100M0V0\n");
    }

    #[test]
    fn test_recording() {
        let rec = RecordingTransport::new(None);
        let mut t: Box<dyn Transport> = Box::new(rec.clone());

        t.send("#254H\r");
        assert_eq!(rec.frames(), vec!["#254H\r".to_string()]);
        assert_eq!(t.protocol(), None);

        rec.clear();
        assert!(rec.frames().is_empty());
        assert_eq!(NullTransport.protocol(), None);
    }
}
