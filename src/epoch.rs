//! Negotiated security parameters and the pending → active commit.
//!
//! Three epochs are held at all times:
//!
//! * `initial`: the NULL epoch used before any keys are in effect.
//! * `pending`: filled in once key negotiation finishes.
//! * `active`: a wholesale copy of `pending` taken at Finished-send time.
//!
//! Each traffic direction (named by the [`Role`] writing the records) resolves
//! to one of them through an [`EpochRef`] tag. There are no aliasing
//! references into the storage, so a commit under `&mut self` can never be
//! observed half way.

use std::fmt;

use zeroize::Zeroize;

use crate::buffer::Buf;
use crate::crypto::{key_expansion, CryptoProvider};
use crate::types::{CipherSuite, Role};
use crate::Error;

/// Per-direction record sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct SequenceNumber(u64);

impl SequenceNumber {
    pub const ZERO: SequenceNumber = SequenceNumber(0);

    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn reset(&mut self) {
        self.0 = 0;
    }

    /// Advance by one. Wrapping would reuse nonces, so it is an error instead.
    pub fn increment(&mut self) -> Result<(), Error> {
        self.0 = self.0.checked_add(1).ok_or(Error::SequenceOverflow)?;
        Ok(())
    }

    /// Big-endian wire form, as mixed into MAC and nonce construction.
    pub fn to_be_bytes(&self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Key material for both directions, cut from the TLS key block.
///
/// Wiped on drop.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct KeyBlock {
    client_mac_key: Buf,
    server_mac_key: Buf,
    client_write_key: Buf,
    server_write_key: Buf,
    client_iv: Buf,
    server_iv: Buf,
}

impl KeyBlock {
    /// Expand the master secret into the key block for `suite`.
    ///
    /// Order on the wire: client MAC, server MAC, client key, server key,
    /// client IV, server IV.
    pub fn derive(
        provider: &CryptoProvider,
        suite: CipherSuite,
        master_secret: &[u8],
        client_random: &[u8],
        server_random: &[u8],
    ) -> Result<KeyBlock, Error> {
        let (mac_len, key_len, iv_len) = suite.key_lengths();
        let total = 2 * (mac_len + key_len + iv_len);

        let mut block = key_expansion(
            provider,
            master_secret,
            client_random,
            server_random,
            total,
            suite.hash_algorithm(),
        )?;

        let mut offset = 0;
        let mut take = |n: usize| {
            let part = Buf::from_slice(&block[offset..offset + n]);
            offset += n;
            part
        };

        let keys = KeyBlock {
            client_mac_key: take(mac_len),
            server_mac_key: take(mac_len),
            client_write_key: take(key_len),
            server_write_key: take(key_len),
            client_iv: take(iv_len),
            server_iv: take(iv_len),
        };

        block.zeroize();

        Ok(keys)
    }

    pub fn mac_key(&self, direction: Role) -> &[u8] {
        match direction {
            Role::Client => &self.client_mac_key,
            Role::Server => &self.server_mac_key,
        }
    }

    pub fn write_key(&self, direction: Role) -> &[u8] {
        match direction {
            Role::Client => &self.client_write_key,
            Role::Server => &self.server_write_key,
        }
    }

    pub fn iv(&self, direction: Role) -> &[u8] {
        match direction {
            Role::Client => &self.client_iv,
            Role::Server => &self.server_iv,
        }
    }

    /// True for the NULL key block.
    pub fn is_empty(&self) -> bool {
        self.client_mac_key.is_empty()
            && self.server_mac_key.is_empty()
            && self.client_write_key.is_empty()
            && self.server_write_key.is_empty()
            && self.client_iv.is_empty()
            && self.server_iv.is_empty()
    }
}

impl Drop for KeyBlock {
    fn drop(&mut self) {
        self.client_mac_key.zeroize();
        self.server_mac_key.zeroize();
        self.client_write_key.zeroize();
        self.server_write_key.zeroize();
        self.client_iv.zeroize();
        self.server_iv.zeroize();
    }
}

impl fmt::Debug for KeyBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyBlock")
    }
}

/// A complete set of security parameters: suite, keys and one sequence
/// number per direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Epoch {
    cipher_suite: CipherSuite,
    keys: KeyBlock,
    client_sequence: SequenceNumber,
    server_sequence: SequenceNumber,
}

impl Epoch {
    /// The NULL_WITH_NULL_NULL epoch every connection starts in.
    pub fn null() -> Epoch {
        Epoch::new(CipherSuite::NULL_WITH_NULL_NULL, KeyBlock::default())
    }

    pub fn new(cipher_suite: CipherSuite, keys: KeyBlock) -> Epoch {
        Epoch {
            cipher_suite,
            keys,
            client_sequence: SequenceNumber::ZERO,
            server_sequence: SequenceNumber::ZERO,
        }
    }

    pub fn cipher_suite(&self) -> CipherSuite {
        self.cipher_suite
    }

    pub fn keys(&self) -> &KeyBlock {
        &self.keys
    }

    /// Sequence number of records written by `direction`.
    pub fn sequence(&self, direction: Role) -> SequenceNumber {
        match direction {
            Role::Client => self.client_sequence,
            Role::Server => self.server_sequence,
        }
    }

    fn sequence_mut(&mut self, direction: Role) -> &mut SequenceNumber {
        match direction {
            Role::Client => &mut self.client_sequence,
            Role::Server => &mut self.server_sequence,
        }
    }
}

/// Which stored epoch a direction currently uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpochRef {
    Initial,
    Pending,
    Active,
}

/// Pending and active epochs plus the per-direction references into them.
#[derive(Debug)]
pub struct EpochState {
    initial: Epoch,
    pending: Epoch,
    active: Epoch,
    client: EpochRef,
    server: EpochRef,
    committed: bool,
}

impl Default for EpochState {
    fn default() -> Self {
        Self::new()
    }
}

impl EpochState {
    pub fn new() -> EpochState {
        EpochState {
            initial: Epoch::null(),
            pending: Epoch::null(),
            active: Epoch::null(),
            client: EpochRef::Initial,
            server: EpochRef::Initial,
            committed: false,
        }
    }

    pub fn pending(&self) -> &Epoch {
        &self.pending
    }

    pub fn active(&self) -> &Epoch {
        &self.active
    }

    /// Whether the pending epoch has been committed into active.
    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// The tag `direction` currently resolves through.
    pub fn reference(&self, direction: Role) -> EpochRef {
        match direction {
            Role::Client => self.client,
            Role::Server => self.server,
        }
    }

    /// The epoch protecting records written by `direction`.
    pub fn epoch_for(&self, direction: Role) -> &Epoch {
        self.resolve(self.reference(direction))
    }

    pub fn resolve(&self, which: EpochRef) -> &Epoch {
        match which {
            EpochRef::Initial => &self.initial,
            EpochRef::Pending => &self.pending,
            EpochRef::Active => &self.active,
        }
    }

    fn resolve_mut(&mut self, which: EpochRef) -> &mut Epoch {
        match which {
            EpochRef::Initial => &mut self.initial,
            EpochRef::Pending => &mut self.pending,
            EpochRef::Active => &mut self.active,
        }
    }

    fn set_reference(&mut self, direction: Role, which: EpochRef) {
        match direction {
            Role::Client => self.client = which,
            Role::Server => self.server = which,
        }
    }

    /// Replace the pending epoch wholesale once key negotiation is done.
    pub fn install_pending(&mut self, epoch: Epoch) -> Result<(), Error> {
        if self.committed {
            return Err(Error::InvariantViolation(
                "pending epoch installed after commit",
            ));
        }
        trace!("Install pending epoch: {:?}", epoch.cipher_suite());
        self.pending = epoch;
        Ok(())
    }

    /// Zero the sequence number of `direction` in the given epoch.
    pub fn reset_sequence(&mut self, which: EpochRef, direction: Role) {
        self.resolve_mut(which).sequence_mut(direction).reset();
    }

    /// Make the pending epoch active for records written by `direction`.
    ///
    /// The outbound counter is zeroed before the copy, so the first record
    /// under the new keys uses sequence number 0. Any direction still
    /// pointing at the now stale pending epoch follows to active.
    pub fn commit(&mut self, direction: Role) {
        self.reset_sequence(EpochRef::Pending, direction);

        self.active = self.pending.clone();
        self.set_reference(direction, EpochRef::Active);

        let peer = direction.peer();
        if self.reference(peer) == EpochRef::Pending {
            self.set_reference(peer, EpochRef::Active);
        }

        self.committed = true;

        debug!(
            "Committed pending epoch ({:?}) for {:?} direction",
            self.active.cipher_suite(),
            direction
        );
    }

    /// Switch the records written by `direction` to the newest epoch, as
    /// triggered by a ChangeCipherSpec written by that role.
    ///
    /// Before any commit that is the pending epoch, afterwards the active one.
    pub fn activate(&mut self, direction: Role) {
        let target = if self.committed {
            EpochRef::Active
        } else {
            EpochRef::Pending
        };
        self.reset_sequence(target, direction);
        self.set_reference(direction, target);

        debug!("{:?} direction now uses {:?} epoch", direction, target);
    }

    /// Sequence number for the next record written by `direction`, advancing
    /// the counter of the epoch that direction resolves to.
    pub fn next_sequence(&mut self, direction: Role) -> Result<SequenceNumber, Error> {
        let which = self.reference(direction);
        let seq = self.resolve_mut(which).sequence_mut(direction);
        let current = *seq;
        seq.increment()?;
        Ok(current)
    }

    /// Throw away negotiated but uncommitted parameters.
    pub fn discard_pending(&mut self) {
        self.pending = Epoch::null();
        for direction in [Role::Client, Role::Server] {
            if self.reference(direction) == EpochRef::Pending {
                self.set_reference(direction, EpochRef::Initial);
            }
        }
    }
}
