//! In-memory doubles for the serial device, the host console and status output.
#![allow(dead_code)]

use miniterm::{
    ConsoleMode, HostConsole, HostInput, LinkOpener, LinkPort, OpenError, SerialLink, StatusEvent,
    StatusReporter,
};
use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const IDLE_SLEEP: Duration = Duration::from_millis(1);

/// One scripted result of a port read
pub enum ReadStep {
    Data(u8),
    Eof,
    Fail(io::Error),
    /// Delete the device node, then fail like a yanked USB adapter
    Unplug(PathBuf),
}

/// Shared state behind every handle of one fake serial device
#[derive(Clone, Default)]
pub struct MockDevice {
    reads: Arc<Mutex<VecDeque<ReadStep>>>,
    written: Arc<Mutex<Vec<u8>>>,
    fail_writes: Arc<AtomicBool>,
    opened: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
}

impl MockDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sending(bytes: &[u8]) -> Self {
        let device = Self::new();
        device.push_bytes(bytes);
        device
    }

    pub fn push_bytes(&self, bytes: &[u8]) {
        let mut reads = self.reads.lock().unwrap();
        reads.extend(bytes.iter().copied().map(ReadStep::Data));
    }

    pub fn push(&self, step: ReadStep) {
        self.reads.lock().unwrap().push_back(step);
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn written(&self) -> Vec<u8> {
        self.written.lock().unwrap().clone()
    }

    /// Handles opened but not yet dropped
    pub fn open_handles(&self) -> usize {
        self.opened.load(Ordering::SeqCst) - self.released.load(Ordering::SeqCst)
    }

    pub fn port(&self) -> Box<dyn LinkPort> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Box::new(MockPort {
            device: self.clone(),
        })
    }

    pub fn link(&self, path: &str) -> SerialLink {
        SerialLink::from_port(path, self.port())
    }
}

struct MockPort {
    device: MockDevice,
}

impl Read for MockPort {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let step = self.device.reads.lock().unwrap().pop_front();
        match step {
            Some(ReadStep::Data(byte)) => {
                buf[0] = byte;
                Ok(1)
            }
            Some(ReadStep::Eof) => Ok(0),
            Some(ReadStep::Fail(e)) => Err(e),
            Some(ReadStep::Unplug(path)) => {
                let _ = std::fs::remove_file(path);
                Err(io::Error::from_raw_os_error(libc::EIO))
            }
            None => {
                std::thread::sleep(IDLE_SLEEP);
                Err(io::Error::new(io::ErrorKind::TimedOut, "no data"))
            }
        }
    }
}

impl Write for MockPort {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.device.fail_writes.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "device gone"));
        }
        self.device.written.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl LinkPort for MockPort {
    fn try_clone_port(&self) -> io::Result<Box<dyn LinkPort>> {
        Ok(self.device.port())
    }
}

impl Drop for MockPort {
    fn drop(&mut self) {
        self.device.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// What the next `open` call should do
pub enum OpenScript {
    Device(MockDevice),
    Denied,
    Unavailable,
    Broken,
}

#[derive(Default)]
pub struct MockOpener {
    script: Mutex<VecDeque<OpenScript>>,
    opens: AtomicUsize,
    bauds: Mutex<Vec<u32>>,
}

impl MockOpener {
    pub fn new(script: Vec<OpenScript>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            ..Default::default()
        })
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn bauds(&self) -> Vec<u32> {
        self.bauds.lock().unwrap().clone()
    }
}

impl LinkOpener for MockOpener {
    fn open(&self, path: &str, baud_rate: u32) -> Result<SerialLink, OpenError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        self.bauds.lock().unwrap().push(baud_rate);

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(OpenScript::Device(device)) => Ok(device.link(path)),
            Some(OpenScript::Denied) => Err(OpenError::from_io(
                path,
                io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied"),
            )),
            Some(OpenScript::Unavailable) => Err(OpenError::from_io(
                path,
                io::Error::new(io::ErrorKind::NotFound, "No such device"),
            )),
            Some(OpenScript::Broken) | None => Err(OpenError::from_io(
                path,
                io::Error::new(io::ErrorKind::Other, "Not a typewriter"),
            )),
        }
    }
}

/// One scripted keyboard action
pub enum InputStep {
    Bytes(Vec<u8>),
    /// Hold further input until the screen shows this text
    AwaitOutput(Vec<u8>),
    Fail,
    Panic,
}

#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> Vec<u8> {
        self.0.lock().unwrap().clone()
    }

    fn contains(&self, needle: &[u8]) -> bool {
        let buf = self.0.lock().unwrap();
        needle.is_empty() || buf.windows(needle.len()).any(|w| w == needle)
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Fake terminal with a scripted keyboard and a captured screen
pub struct MockConsole {
    mode: Mutex<ConsoleMode>,
    raw_entries: AtomicUsize,
    refuse_raw: AtomicBool,
    script: Arc<Mutex<VecDeque<InputStep>>>,
    screen: SharedBuffer,
}

impl MockConsole {
    pub fn new(script: Vec<InputStep>) -> Arc<Self> {
        Arc::new(Self {
            mode: Mutex::new(ConsoleMode::Cooked),
            raw_entries: AtomicUsize::new(0),
            refuse_raw: AtomicBool::new(false),
            script: Arc::new(Mutex::new(script.into())),
            screen: SharedBuffer::default(),
        })
    }

    pub fn refusing_raw() -> Arc<Self> {
        let console = Self::new(Vec::new());
        console.refuse_raw.store(true, Ordering::SeqCst);
        console
    }

    pub fn screen(&self) -> Vec<u8> {
        self.screen.contents()
    }

    pub fn raw_entries(&self) -> usize {
        self.raw_entries.load(Ordering::SeqCst)
    }
}

impl HostConsole for MockConsole {
    fn enable_raw(&self) -> io::Result<()> {
        if self.refuse_raw.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::Other, "not a terminal"));
        }
        self.raw_entries.fetch_add(1, Ordering::SeqCst);
        *self.mode.lock().unwrap() = ConsoleMode::Raw;
        Ok(())
    }

    fn disable_raw(&self) -> io::Result<()> {
        *self.mode.lock().unwrap() = ConsoleMode::Cooked;
        Ok(())
    }

    fn mode(&self) -> ConsoleMode {
        *self.mode.lock().unwrap()
    }

    fn input(&self) -> Box<dyn HostInput> {
        Box::new(ScriptedInput {
            script: Arc::clone(&self.script),
            screen: self.screen.clone(),
        })
    }

    fn output(&self) -> Box<dyn Write + Send> {
        Box::new(self.screen.clone())
    }
}

pub struct ScriptedInput {
    script: Arc<Mutex<VecDeque<InputStep>>>,
    screen: SharedBuffer,
}

impl ScriptedInput {
    pub fn new(script: Vec<InputStep>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            screen: SharedBuffer::default(),
        }
    }
}

impl HostInput for ScriptedInput {
    fn poll_input(&mut self, timeout: Duration) -> io::Result<Option<Vec<u8>>> {
        let mut script = self.script.lock().unwrap();
        let step = match script.front() {
            None => None,
            Some(InputStep::AwaitOutput(needle)) if !self.screen.contains(needle) => None,
            Some(_) => script.pop_front(),
        };
        drop(script);

        match step {
            None => {
                std::thread::sleep(timeout.min(IDLE_SLEEP));
                Ok(None)
            }
            Some(InputStep::AwaitOutput(_)) => Ok(None),
            Some(InputStep::Bytes(bytes)) => Ok(Some(bytes)),
            Some(InputStep::Fail) => Err(io::Error::new(io::ErrorKind::Other, "stdin closed")),
            Some(InputStep::Panic) => panic!("keyboard driver crashed"),
        }
    }
}

/// Collects status events in order
#[derive(Default)]
pub struct StatusLog(Mutex<Vec<StatusEvent>>);

impl StatusLog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<StatusEvent> {
        self.0.lock().unwrap().clone()
    }
}

impl StatusReporter for StatusLog {
    fn report(&self, event: StatusEvent) {
        self.0.lock().unwrap().push(event);
    }
}

pub const CTRL_C: u8 = 0x03;

pub fn ctrl_c() -> InputStep {
    InputStep::Bytes(vec![CTRL_C])
}

pub fn await_screen(text: &[u8]) -> InputStep {
    InputStep::AwaitOutput(text.to_vec())
}
