//! Handshake stream and transcript.
//!
//! [`HandshakeIo`] is the boundary to the transport: outgoing handshake bytes
//! are appended for the transport to collect, incoming bytes are fed in and
//! read back with exact lengths. A read never blocks and never pads; either
//! all requested bytes are there or it fails.

use nom::IResult;

use crate::buffer::Buf;
use crate::crypto::CryptoProvider;
use crate::types::HashAlgorithm;
use crate::Error;

#[derive(Debug)]
pub struct HandshakeIo {
    outgoing: Buf,
    incoming: Buf,
    read_pos: usize,
    max_incoming: usize,
    step: Option<StepMark>,
}

/// Where the current handshake step started in each stream.
#[derive(Debug, Clone, Copy)]
struct StepMark {
    written: usize,
    read: usize,
}

impl HandshakeIo {
    pub fn new(max_incoming: usize) -> Self {
        HandshakeIo {
            outgoing: Buf::new(),
            incoming: Buf::new(),
            read_pos: 0,
            max_incoming,
            step: None,
        }
    }

    /// Append bytes to the outgoing stream.
    pub fn write_bytes(&mut self, data: &[u8]) {
        self.outgoing.extend_from_slice(data);
    }

    /// Bytes written but not yet collected by the transport.
    pub fn outgoing(&self) -> &[u8] {
        &self.outgoing
    }

    /// Hand pending outgoing bytes to the transport.
    ///
    /// While a step is running, bytes it wrote stay behind until the step
    /// has ended.
    pub fn take_outgoing(&mut self) -> Buf {
        let Some(mark) = &mut self.step else {
            return std::mem::take(&mut self.outgoing);
        };

        let taken = Buf::from_slice(&self.outgoing[..mark.written]);
        self.outgoing.drain_front(mark.written);
        mark.written = 0;
        taken
    }

    /// Append bytes received from the transport.
    pub fn feed(&mut self, data: &[u8]) -> Result<(), Error> {
        // Reclaim space of what has already been consumed, but not what the
        // running step consumed.
        let reclaim = self.step.map_or(self.read_pos, |mark| mark.read);
        if reclaim > 0 {
            self.incoming.drain_front(reclaim);
            self.read_pos -= reclaim;
            if let Some(mark) = &mut self.step {
                mark.read = 0;
            }
        }

        if self.incoming.len() + data.len() > self.max_incoming {
            return Err(Error::ReceiveBufferFull);
        }

        self.incoming.extend_from_slice(data);
        Ok(())
    }

    /// Unread incoming bytes.
    pub fn remaining(&self) -> &[u8] {
        &self.incoming[self.read_pos..]
    }

    pub fn available(&self) -> usize {
        self.incoming.len() - self.read_pos
    }

    /// Start recording the bytes of one handshake step.
    pub(crate) fn begin_step(&mut self) {
        self.step = Some(StepMark {
            written: self.outgoing.len(),
            read: self.read_pos,
        });
    }

    /// Stop recording. Returns what the step wrote and what it consumed.
    pub(crate) fn end_step(&mut self) -> (Buf, Buf) {
        match self.step.take() {
            Some(mark) => (
                Buf::from_slice(&self.outgoing[mark.written..]),
                Buf::from_slice(&self.incoming[mark.read..self.read_pos]),
            ),
            None => (Buf::new(), Buf::new()),
        }
    }

    /// Read exactly `len` bytes.
    ///
    /// Nothing is consumed if fewer bytes are available.
    pub fn read_bytes(&mut self, len: usize) -> Result<&[u8], Error> {
        let available = self.available();
        if available < len {
            return Err(Error::TooShort {
                needed: len,
                available,
            });
        }

        let start = self.read_pos;
        self.read_pos += len;
        Ok(&self.incoming[start..start + len])
    }

    /// Run a parser over the unread bytes and consume what it used.
    pub fn read_with<'a, T>(
        &'a mut self,
        parser: impl FnOnce(&'a [u8]) -> IResult<&'a [u8], T>,
    ) -> Result<T, Error> {
        let HandshakeIo {
            incoming, read_pos, ..
        } = self;
        let incoming: &'a Buf = incoming;

        let input = &incoming[*read_pos..];
        let (rest, value) = parser(input)?;
        *read_pos += input.len() - rest.len();

        Ok(value)
    }
}

/// Raw bytes of all handshake messages so far, hashed on demand.
///
/// The hash algorithm is only known once the cipher suite is negotiated,
/// so the bytes are kept rather than a running hash.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Buf,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: &[u8]) {
        self.messages.extend_from_slice(message);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.messages
    }

    /// Hash(handshake_messages) with the given algorithm.
    pub fn hash(&self, provider: &CryptoProvider, algorithm: HashAlgorithm) -> Buf {
        let mut ctx = provider.hash_provider.create_hash(algorithm);
        ctx.update(&self.messages);
        let mut out = Buf::new();
        ctx.clone_and_finalize(&mut out);
        out
    }
}
