//! Channel handlers invoked by the transport collaborator.
//!
//! The transport calls [`LaneLink::on_write`] from its own callback
//! context whenever the peer writes a channel, and [`LaneLink::on_read`]
//! when the peer reads one. Handlers never touch engine state directly;
//! they decode, then enqueue intents for the scheduler. This may run
//! concurrently with the scheduler task.

use log::warn;

use crate::intent::{IntentSender, LaneIntent};
use crate::proto::bulk::{self, FeedOutcome, ReassemblyBuffer};
use crate::proto::config::{ConfigRequest, ConfigSnapshot};
use crate::proto::control::ControlRequest;
use crate::snapshot::ConfigCell;
use crate::units::rgb_from_u32;

/// Bulk channel readable value after a successful reassembly + decode.
pub const BULK_ACK_OK: u8 = 0x00;
/// Bulk channel readable value after any validation or decode failure.
pub const BULK_ACK_ERROR: u8 = 0x01;

/// The lane's addressable protocol channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelId {
    Control,
    Config,
    BulkConfig,
}

/// Per-lane protocol endpoint state.
pub struct LaneLink<'a, const INTENTS: usize> {
    intents: IntentSender<'a, INTENTS>,
    config_view: &'a ConfigCell,
    reassembly: ReassemblyBuffer,
    bulk_ack: u8,
}

impl<'a, const INTENTS: usize> LaneLink<'a, INTENTS> {
    pub fn new(intents: IntentSender<'a, INTENTS>, config_view: &'a ConfigCell) -> Self {
        Self {
            intents,
            config_view,
            reassembly: ReassemblyBuffer::new(),
            bulk_ack: BULK_ACK_OK,
        }
    }

    /// Handle a peer write on `channel`.
    ///
    /// Malformed writes are logged and dropped; nothing is echoed back.
    pub fn on_write(&mut self, channel: ChannelId, data: &[u8]) {
        match channel {
            ChannelId::Control => self.write_control(data),
            ChannelId::Config => self.write_config(data),
            ChannelId::BulkConfig => self.write_bulk(data),
        }
    }

    /// Handle a peer read on `channel`; returns the bytes written into
    /// `out`. Control is write-only and reads back empty.
    pub fn on_read(&self, channel: ChannelId, out: &mut [u8]) -> usize {
        match channel {
            ChannelId::Control => 0,
            ChannelId::Config => {
                let snapshot = ConfigSnapshot::from_config(&self.config_view.get());
                match snapshot.encode(out) {
                    Ok(len) => len,
                    Err(_) => {
                        warn!("config read buffer too small");
                        0
                    }
                }
            }
            ChannelId::BulkConfig => {
                if out.is_empty() {
                    return 0;
                }
                out[0] = self.bulk_ack;
                1
            }
        }
    }

    fn write_control(&self, data: &[u8]) {
        let intent = match ControlRequest::decode(data) {
            Ok(ControlRequest::SetStatus(status)) => LaneIntent::SetStatus(status),
            Ok(ControlRequest::SetSpeed(speed)) => LaneIntent::SetSpeed(speed),
            Err(err) => {
                warn!("control write rejected: {:?}", err);
                return;
            }
        };
        self.submit(intent);
    }

    fn write_config(&self, data: &[u8]) {
        let intent = match ConfigRequest::decode(data) {
            Ok(ConfigRequest::Color(rgb)) => LaneIntent::SetColor(rgb_from_u32(rgb)),
            Ok(ConfigRequest::Length(geometry)) => LaneIntent::SetGeometry(geometry),
            Err(err) => {
                warn!("config write rejected: {:?}", err);
                return;
            }
        };
        self.submit(intent);
    }

    fn write_bulk(&mut self, data: &[u8]) {
        match self.reassembly.feed(data) {
            Ok(FeedOutcome::Incomplete) => {}
            Ok(FeedOutcome::Complete(payload)) => match bulk::decode_batch(&payload) {
                Ok(tracks) => {
                    self.bulk_ack = BULK_ACK_OK;
                    self.submit(LaneIntent::ReplaceTracks(tracks));
                }
                Err(err) => {
                    warn!("bulk payload rejected: {:?}", err);
                    self.bulk_ack = BULK_ACK_ERROR;
                }
            },
            Err(err) => {
                warn!("bulk fragment rejected: {:?}", err);
                self.bulk_ack = BULK_ACK_ERROR;
            }
        }
    }

    fn submit(&self, intent: LaneIntent) {
        if self.intents.try_send(intent).is_err() {
            warn!("intent queue full, dropping request");
        }
    }
}
