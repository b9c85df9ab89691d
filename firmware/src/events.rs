use embassy_sync::blocking_mutex::raw::ThreadModeRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::pubsub::{PubSubChannel, Publisher, Subscriber};

use akc695x::{Error, Mode, TuneStatus};

/// Requests from the console to the radio task.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SystemEvent {
    RadioFmOn,
    RadioAmOn,
    RadioOff,
    /// Preset index within the current mode.
    RadioBand(u8),
    RadioSeekUp,
    RadioSeekDown,
    RadioStepUp,
    RadioStepDown,
    /// 100 kHz units in FM, kHz in AM.
    RadioSetFrequency(u16),
    RadioSetStep(u16),
    RadioMute,
    RadioUnmute,
    RadioVolumeUp,
    RadioVolumeDown,
    RadioVolumeSet(u8),
    RadioStatus,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SystemNotify {
    TuneStatus(TuneStatus),
    BandChanged { mode: Mode, band: u8, min: u16, max: u16 },
    StepChanged(u16),
    SupplyVoltage(u16),
    RadioFmOn,
    RadioAmOn,
    RadioOff,
    RadioMute,
    RadioUnmute,
    VolumeChanged(u8),
    RadioError(Error),
}

const NOTIFY_CAP: usize = 4;
const NOTIFY_SUBS: usize = 2;
const NOTIFY_PUBS: usize = 2;

pub type NotifySubscriber<'a> =
    Subscriber<'a, ThreadModeRawMutex, SystemNotify, NOTIFY_CAP, NOTIFY_SUBS, NOTIFY_PUBS>;
pub type NotifyPublisher<'a> =
    Publisher<'a, ThreadModeRawMutex, SystemNotify, NOTIFY_CAP, NOTIFY_SUBS, NOTIFY_PUBS>;

static NOTIFICATION_CHANNEL: PubSubChannel<
    ThreadModeRawMutex,
    SystemNotify,
    NOTIFY_CAP,
    NOTIFY_SUBS,
    NOTIFY_PUBS,
> = PubSubChannel::new();
static EVENT_CHANNEL: Channel<ThreadModeRawMutex, SystemEvent, 2> = Channel::new();

/// Drops the event when the radio task is still busy with the previous two.
pub fn event_try_send(event: SystemEvent) -> bool {
    EVENT_CHANNEL.try_send(event).is_ok()
}

pub async fn event_receive() -> SystemEvent {
    EVENT_CHANNEL.receive().await
}

pub fn notify_subscriber<'a>() -> Result<NotifySubscriber<'a>, embassy_sync::pubsub::Error> {
    NOTIFICATION_CHANNEL.subscriber()
}

pub fn notify_publisher<'a>() -> Result<NotifyPublisher<'a>, embassy_sync::pubsub::Error> {
    NOTIFICATION_CHANNEL.publisher()
}
