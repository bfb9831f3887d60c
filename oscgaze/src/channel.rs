//! Gaze channel decoding
//!
//! Maps decoded OSC messages onto the three recognized gaze channels. Each
//! channel carries exactly one float per message; anything else on a
//! recognized address is a per-message decode error for the caller to log
//! and discard. Messages on other addresses are not errors, they simply
//! belong to somebody else's parameter space.

use crate::error::{Error, Result};
use crate::osc::{OscArg, OscMessage};

/// Address pattern carrying the shared vertical component
pub const EYES_Y_ADDRESS: &str = "/avatar/parameters/EyesY";
/// Address pattern carrying the left-eye horizontal component
pub const LEFT_EYE_X_ADDRESS: &str = "/avatar/parameters/LeftEyeX";
/// Address pattern carrying the right-eye horizontal component
pub const RIGHT_EYE_X_ADDRESS: &str = "/avatar/parameters/RightEyeX";

/// One of the three recognized gaze channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Shared vertical gaze component
    EyesY,
    /// Left-eye horizontal gaze component
    LeftEyeX,
    /// Right-eye horizontal gaze component
    RightEyeX,
}

impl Channel {
    /// Match an OSC address pattern against the recognized channels
    pub fn from_address(address: &str) -> Option<Channel> {
        match address {
            EYES_Y_ADDRESS => Some(Channel::EyesY),
            LEFT_EYE_X_ADDRESS => Some(Channel::LeftEyeX),
            RIGHT_EYE_X_ADDRESS => Some(Channel::RightEyeX),
            _ => None,
        }
    }

    /// Address pattern this channel is received on
    pub fn address(&self) -> &'static str {
        match self {
            Channel::EyesY => EYES_Y_ADDRESS,
            Channel::LeftEyeX => LEFT_EYE_X_ADDRESS,
            Channel::RightEyeX => RIGHT_EYE_X_ADDRESS,
        }
    }
}

/// A single decoded channel reading, consumed immediately by the fusion engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelValue {
    pub channel: Channel,
    pub value: f32,
}

/// Interpret one OSC message as a channel reading.
///
/// Returns `Ok(None)` for addresses outside the recognized set (silently
/// ignored upstream), `Ok(Some(..))` for a well-formed reading, and an error
/// when a recognized address does not carry exactly one float.
pub fn decode_channel(message: &OscMessage) -> Result<Option<ChannelValue>> {
    let Some(channel) = Channel::from_address(&message.address) else {
        return Ok(None);
    };

    match message.args.as_slice() {
        [OscArg::Float(value)] => Ok(Some(ChannelValue {
            channel,
            value: *value,
        })),
        [other] => Err(Error::Channel(format!(
            "{}: expected float argument, got {:?}",
            message.address, other
        ))),
        args => Err(Error::Channel(format!(
            "{}: expected exactly one argument, got {}",
            message.address,
            args.len()
        ))),
    }
}
