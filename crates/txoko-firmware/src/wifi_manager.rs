use core::convert::TryInto;
use std::time::{Duration, Instant};

use embedded_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::modem::Modem;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};

/// Total time allowed for joining the network at startup.
pub const JOIN_BUDGET: Duration = Duration::from_secs(20);
const RETRY_PAUSE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct WifiCredentials {
    pub ssid: String,
    pub password: String,
}

/// Station-mode WiFi. Owns the driver so the link stays up for the
/// lifetime of the manager.
pub struct WifiManager {
    modem: Option<Modem>,
    sys_loop: EspSystemEventLoop,
    nvs: Option<EspDefaultNvsPartition>,
    wifi: Option<BlockingWifi<EspWifi<'static>>>,
    connected: bool,
}

impl WifiManager {
    pub fn new(modem: Modem, sys_loop: EspSystemEventLoop) -> Self {
        Self {
            modem: Some(modem),
            sys_loop,
            nvs: EspDefaultNvsPartition::take().ok(),
            wifi: None,
            connected: false,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Join `credentials.ssid`, retrying until `budget` runs out.
    pub fn join(&mut self, credentials: &WifiCredentials, budget: Duration) -> Result<(), String> {
        let ssid = credentials.ssid.trim().to_string();
        if ssid.is_empty() {
            return Err(String::from("STA SSID is empty"));
        }

        let ssid_h = ssid
            .as_str()
            .try_into()
            .map_err(|_| String::from("STA SSID too long (max 32)"))?;

        let password = credentials.password.trim().to_string();
        let (auth_method, password_h) = if password.is_empty() {
            (AuthMethod::None, Default::default())
        } else {
            (
                AuthMethod::WPA2Personal,
                password
                    .as_str()
                    .try_into()
                    .map_err(|_| String::from("STA password too long (max 64)"))?,
            )
        };

        let wifi = self.ensure_wifi()?;
        let conf = Configuration::Client(ClientConfiguration {
            ssid: ssid_h,
            bssid: None,
            auth_method,
            password: password_h,
            channel: None,
            ..Default::default()
        });

        wifi.set_configuration(&conf)
            .map_err(|err| format!("wifi sta config failed: {}", err))?;
        wifi.start()
            .map_err(|err| format!("wifi sta start failed: {}", err))?;

        let started = Instant::now();
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match wifi.connect() {
                Ok(()) => break,
                Err(err) => {
                    log::warn!("WiFi connect attempt {} failed: {}", attempt, err);
                    if started.elapsed() + RETRY_PAUSE >= budget {
                        return Err(format!(
                            "wifi sta connect gave up after {} attempts",
                            attempt
                        ));
                    }
                    let _ = wifi.disconnect();
                    std::thread::sleep(RETRY_PAUSE);
                }
            }
        }

        wifi.wait_netif_up()
            .map_err(|err| format!("wifi sta netif up failed: {}", err))?;

        let ip = wifi
            .wifi()
            .sta_netif()
            .get_ip_info()
            .map_err(|err| format!("wifi sta ip failed: {}", err))?
            .ip;
        self.connected = true;
        log::info!(
            "WiFi joined '{}' as {} ({} attempts, {}ms)",
            ssid,
            ip,
            attempt,
            started.elapsed().as_millis()
        );
        Ok(())
    }

    fn ensure_wifi(&mut self) -> Result<&mut BlockingWifi<EspWifi<'static>>, String> {
        if self.wifi.is_none() {
            let Some(modem) = self.modem.take() else {
                return Err(String::from("Wi-Fi modem unavailable"));
            };
            let esp_wifi = EspWifi::new(modem, self.sys_loop.clone(), self.nvs.take())
                .map_err(|err| format!("wifi init failed: {}", err))?;
            let blocking = BlockingWifi::wrap(esp_wifi, self.sys_loop.clone())
                .map_err(|err| format!("wifi wrapper init failed: {}", err))?;
            self.wifi = Some(blocking);
        }
        self.wifi
            .as_mut()
            .ok_or_else(|| String::from("wifi init failed"))
    }
}
