//! SNTP sync and the local wall clock built on it.

use std::time::{Duration, Instant};

use esp_idf_svc::sntp::{EspSntp, OperatingMode, SntpConf, SyncMode, SyncStatus};
use txoko_ui::{ClockError, ClockSource, WallTime};

const SNTP_SERVERS: [&str; 2] = ["pool.ntp.org", "time.google.com"];
/// How long startup waits for the first sync.
pub const SYNC_BUDGET: Duration = Duration::from_secs(10);
const POLL_INTERVAL: Duration = Duration::from_millis(250);
/// 2001-09-09; anything earlier means the RTC was never set.
const MIN_SYNCED_EPOCH: libc::time_t = 1_000_000_000;

/// Set `TZ` and start SNTP, waiting up to `budget` for the first sync.
///
/// Returns the client even on timeout; it keeps syncing in the background
/// for as long as it is alive.
pub fn sync_time(tz: &str, budget: Duration) -> anyhow::Result<EspSntp<'static>> {
    log::info!("Setting timezone: {}", tz);
    std::env::set_var("TZ", tz);

    // Slot count follows CONFIG_LWIP_SNTP_MAX_SERVERS.
    let mut conf = SntpConf {
        sync_mode: SyncMode::Immediate,
        operating_mode: OperatingMode::Poll,
        ..Default::default()
    };
    for (slot, server) in conf.servers.iter_mut().zip(SNTP_SERVERS) {
        *slot = server;
    }
    let sntp = EspSntp::new_with_callback(&conf, |_| {
        log::debug!("SNTP sync callback");
    })?;

    let started = Instant::now();
    while started.elapsed() < budget {
        if sntp.get_sync_status() == SyncStatus::Completed {
            log::info!("SNTP synced after {}ms", started.elapsed().as_millis());
            return Ok(sntp);
        }
        std::thread::sleep(POLL_INTERVAL);
    }

    log::warn!(
        "SNTP not synced within {}s, continuing unsynchronized",
        budget.as_secs()
    );
    Ok(sntp)
}

/// Local time from the system RTC, honoring `TZ`.
#[derive(Debug, Default)]
pub struct LocalClock;

impl ClockSource for LocalClock {
    fn now(&mut self) -> Result<WallTime, ClockError> {
        let mut now: libc::time_t = 0;
        unsafe {
            libc::time(&mut now);
        }
        if now < MIN_SYNCED_EPOCH {
            return Err(ClockError::NotSynchronized);
        }

        let mut tm: libc::tm = unsafe { core::mem::zeroed() };
        let converted = unsafe { libc::localtime_r(&now, &mut tm) };
        if converted.is_null() {
            return Err(ClockError::Conversion);
        }

        let hour = u8::try_from(tm.tm_hour).map_err(|_| ClockError::Conversion)?;
        let minute = u8::try_from(tm.tm_min).map_err(|_| ClockError::Conversion)?;
        WallTime::new(hour, minute).ok_or(ClockError::Conversion)
    }
}
