use core::convert::TryInto;
use std::{sync::Arc, thread::JoinHandle, time::SystemTime};

use embedded_svc::{
    http::{Headers, Method},
    io::{Read, Write},
    wifi::{ClientConfiguration, Configuration},
};

use esp_idf_svc::{
    eventloop::EspSystemEventLoop,
    http::server::EspHttpServer,
    nvs::EspDefaultNvsPartition,
    wifi::{BlockingWifi, EspWifi},
};
use log::*;
use world_clock::{
    api::{self, Reply, MAX_LEN},
    threads::WorkerThread,
};
use world_clock_graphics::ClockState;

const SSID: &str = env!("WIFI_SSID");
const PASSWORD: &str = env!("WIFI_PASS");

const STACK_SIZE_KB: usize = 10;
const STACK_SIZE: usize = STACK_SIZE_KB * 1024;

pub fn spawn_wifi_control_thread(
    state: Arc<ClockState>,
    modem: esp_idf_hal::modem::Modem,
) -> std::io::Result<JoinHandle<()>> {
    WorkerThread::new("wifi_control")
        .with_stack_size(STACK_SIZE_KB)
        .spawn(move || {
            if let Err(e) = wifi_control_thread(state, modem) {
                error!("WiFi control thread failed: {:?}", e);
            }
        })
}

fn wifi_control_thread(
    state: Arc<ClockState>,
    modem: esp_idf_hal::modem::Modem,
) -> anyhow::Result<()> {
    let start_time = SystemTime::now();
    let sys_loop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    let mut wifi = BlockingWifi::wrap(EspWifi::new(modem, sys_loop.clone(), Some(nvs))?, sys_loop)?;

    connect_wifi(&mut wifi)?;

    let mut server = create_server()?;

    // GET / - current zone, time and hand angles
    let state_clone = state.clone();
    server.fn_handler("/", Method::Get, move |req| {
        let reply = api::get_status(&state_clone, &start_time);
        req.into_status_response(reply.status)?
            .write_all(reply.body.as_bytes())?;
        Result::<(), anyhow::Error>::Ok(())
    })?;

    // POST /timezone - switches the displayed zone
    let state_clone = state.clone();
    server.fn_handler("/timezone", Method::Post, move |mut req| {
        let len = req.content_len().unwrap_or(0) as usize;
        let reply = if len > MAX_LEN {
            Reply::too_large()
        } else {
            let mut buf = vec![0; len];
            req.read_exact(&mut buf)?;
            api::post_timezone(&state_clone, &start_time, &buf)
        };
        req.into_status_response(reply.status)?
            .write_all(reply.body.as_bytes())?;
        Result::<(), anyhow::Error>::Ok(())
    })?;

    loop {
        if !wifi.is_connected()? {
            error!("WiFi connection lost, attempting to reconnect...");
            if let Err(e) = wifi.connect() {
                error!("Failed to reconnect: {:?}", e);
            } else if let Err(e) = wifi.wait_netif_up() {
                error!(
                    "Network interface failed to come up after reconnect: {:?}",
                    e
                );
            } else {
                info!("WiFi reconnected successfully");
            }
        }
        std::thread::sleep(std::time::Duration::from_secs(5));
    }
}

fn connect_wifi(wifi: &mut BlockingWifi<EspWifi<'static>>) -> anyhow::Result<()> {
    let wifi_configuration = Configuration::Client(ClientConfiguration {
        ssid: SSID
            .try_into()
            .map_err(|_| anyhow::anyhow!("WIFI_SSID is too long"))?,
        password: PASSWORD
            .try_into()
            .map_err(|_| anyhow::anyhow!("WIFI_PASS is too long"))?,
        ..Default::default()
    });

    wifi.set_configuration(&wifi_configuration)?;

    wifi.start()?;
    info!("WiFi started");

    wifi.connect()?;
    info!("WiFi connected");

    wifi.wait_netif_up()?;
    info!("WiFi network interface up");

    let ip_info = wifi.wifi().sta_netif().get_ip_info()?;
    info!("Clock control listening on http://{}/", ip_info.ip);

    Ok(())
}

fn create_server() -> anyhow::Result<EspHttpServer<'static>> {
    let server_configuration = esp_idf_svc::http::server::Configuration {
        stack_size: STACK_SIZE,
        ..Default::default()
    };

    Ok(EspHttpServer::new(&server_configuration)?)
}
