//! Infrared remote receiver.
//!
//! Wraps an [`IrDecoder`] and forwards the command code of every frame with
//! a recognised protocol. After any decoded frame a short hold-off window
//! discards further frames, which swallows the auto-repeat bursts most
//! remotes send while a button is held.

use embassy_time::{Duration, Instant};
use platform::config::IR_HOLDOFF_MS;
use platform::{Clock, IrDecoder, IrProtocol};
use platform::{debug, info, trace};

/// Receiver of remote-control commands.
pub trait RemoteHandler {
    /// A frame with a recognised protocol carried `command`.
    fn on_command(&mut self, _command: u16) {}
}

impl RemoteHandler for () {}

impl<H: RemoteHandler + ?Sized> RemoteHandler for &mut H {
    fn on_command(&mut self, command: u16) {
        (**self).on_command(command);
    }
}

/// Polled infrared remote adapter.
pub struct IrReceiver<D, C, H = ()> {
    decoder: D,
    clock: C,
    handler: H,
    holdoff: Duration,
    holdoff_until: Option<Instant>,
}

impl<D: IrDecoder, C: Clock> IrReceiver<D, C> {
    /// Create a receiver with the default 100 ms hold-off and no handler.
    pub fn new(decoder: D, clock: C) -> Self {
        Self {
            decoder,
            clock,
            handler: (),
            holdoff: Duration::from_millis(IR_HOLDOFF_MS),
            holdoff_until: None,
        }
    }
}

impl<D, C, H> IrReceiver<D, C, H> {
    /// Attach a command handler, replacing the current one.
    pub fn with_handler<H2: RemoteHandler>(self, handler: H2) -> IrReceiver<D, C, H2> {
        IrReceiver {
            decoder: self.decoder,
            clock: self.clock,
            handler,
            holdoff: self.holdoff,
            holdoff_until: self.holdoff_until,
        }
    }

    /// Change the hold-off window.
    #[must_use]
    pub fn with_holdoff_ms(mut self, ms: u64) -> Self {
        self.holdoff = Duration::from_millis(ms);
        self
    }

    /// The attached handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Mutable access to the attached handler.
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }
}

impl<D: IrDecoder, C: Clock, H: RemoteHandler> IrReceiver<D, C, H> {
    /// Poll the decoder once.
    ///
    /// Returns the command delivered to the handler on this tick, if any.
    pub fn tick(&mut self) -> Option<u16> {
        let frame = self.decoder.poll()?;
        let now = self.clock.now();

        if let Some(until) = self.holdoff_until {
            if now < until {
                trace!("[IR] frame dropped during hold-off");
                return None;
            }
        }
        self.holdoff_until = now.checked_add(self.holdoff);

        if frame.protocol == IrProtocol::Unknown {
            debug!("[IR] unknown protocol raw={:#x}", frame.raw);
            return None;
        }

        info!(
            "[IR] proto={} cmd={:#x} addr={:#x} raw={:#x}",
            frame.protocol.as_str(),
            frame.command,
            frame.address,
            frame.raw
        );
        self.handler.on_command(frame.command);
        Some(frame.command)
    }
}
