// Control Task - TCP-Kontrollkanal für Sprach-Assistent / App
use defmt::{Debug2Format, error, info, warn};
use embassy_futures::select::{Either, select};
use embassy_net::Stack;
use embassy_net::tcp::{self, TcpSocket};
use embassy_time::{Duration, Timer};
use embedded_io_async::Write;
use voice_led_core::frame::{self, FrameKind, MAX_FRAME_SIZE};

use crate::config::*;
use crate::{Commands, NotifyChannel, NotifySubscriber};

/// Control Task - läuft parallel zu anderen Tasks
///
/// **Task Pool:** Diese Task wird `CONTROL_TASK_POOL`x gespawnt, jede
/// Instanz bedient genau eine Verbindung auf `CONTROL_PORT`:
/// - Sendet nach dem Accept einen Hello-Frame (Klasse + Name)
/// - Request-Frames gehen an den Kommando-Handler, Antwort als Response-Frame
/// - Farb-Änderungen kommen über den PubSubChannel und gehen als Notify-Frame raus
///
/// # Parameter
/// - `task_id`: Eindeutige ID für diese Instanz
/// - `stack`: embassy-net Stack für Netzwerk-Zugriff
/// - `commands`: Kommando-Handler (Core)
/// - `notifications`: PubSub Channel für Farb-Notifications
#[embassy_executor::task(pool_size = CONTROL_TASK_POOL)]
pub async fn control_task(
    task_id: usize,
    stack: &'static Stack<'static>,
    commands: &'static Commands,
    notifications: &'static NotifyChannel,
) {
    wait_for_network(stack).await;
    info!("Control[{}]: listening on port {}", task_id, CONTROL_PORT);

    let mut rx_buffer = [0u8; TCP_RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TCP_TX_BUFFER_SIZE];

    loop {
        let mut socket = TcpSocket::new(*stack, &mut rx_buffer, &mut tx_buffer);

        if let Err(e) = socket.accept(CONTROL_PORT).await {
            warn!("Control[{}]: accept failed: {}", task_id, Debug2Format(&e));
            continue;
        }
        info!(
            "Control[{}]: peer connected from {}",
            task_id,
            Debug2Format(&socket.remote_endpoint())
        );

        // Subscriber erst nach dem Accept: alte Farben sind für neue Peers uninteressant
        match notifications.subscriber() {
            Ok(mut subscriber) => {
                match serve_connection(&mut socket, commands, &mut subscriber).await {
                    Ok(()) => info!("Control[{}]: peer closed the connection", task_id),
                    Err(e) => warn!("Control[{}]: connection dropped: {}", task_id, e),
                }
            }
            Err(_) => error!("Control[{}]: no subscriber slot available", task_id),
        }

        socket.close();
        let _ = socket.flush().await;
        socket.abort();
    }
}

/// Wartet bis Netzwerk-Verbindung verfügbar ist
async fn wait_for_network(stack: &'static Stack<'static>) {
    loop {
        if stack.is_link_up() && stack.config_v4().is_some() {
            break;
        }
        Timer::after(Duration::from_millis(500)).await;
    }
}

/// Bedient eine Verbindung bis der Peer trennt oder ein Fehler auftritt
async fn serve_connection(
    socket: &mut TcpSocket<'_>,
    commands: &Commands,
    subscriber: &mut NotifySubscriber,
) -> Result<(), ControlError> {
    send_hello(socket).await?;

    // Empfangene, noch nicht verarbeitete Bytes
    let mut inbox = [0u8; MAX_FRAME_SIZE];
    let mut filled = 0;

    loop {
        match select(socket.read(&mut inbox[filled..]), subscriber.next_message_pure()).await {
            Either::First(Ok(0)) => return Ok(()),
            Either::First(Ok(n)) => {
                filled += n;

                while let Some(received) = frame::decode(&inbox[..filled])? {
                    let used = received.encoded_len();
                    match received.kind {
                        FrameKind::Request => {
                            handle_request(socket, commands, received.payload).await?
                        }
                        kind => warn!("Control: ignoring {} frame from peer", kind),
                    }
                    inbox.copy_within(used..filled, 0);
                    filled -= used;
                }
            }
            Either::First(Err(e)) => return Err(ControlError::Read(e)),
            Either::Second(rgb) => send_frame(socket, FrameKind::Notify, &rgb).await?,
        }
    }
}

/// Führt eine Anfrage aus und schickt die Antwort zurück
///
/// Verwirft der Handler die Anfrage, bekommt der Peer keine Antwort.
async fn handle_request(
    socket: &mut TcpSocket<'_>,
    commands: &Commands,
    request: &[u8],
) -> Result<(), ControlError> {
    let mut buffer = [0u8; COMMAND_BUFFER_SIZE];
    let Some(slot) = buffer.get_mut(..request.len()) else {
        warn!("Control: request of {} bytes does not fit", request.len());
        return Ok(());
    };
    slot.copy_from_slice(request);

    match commands.handle_request(&mut buffer, 0, request.len()) {
        Ok(len) => send_frame(socket, FrameKind::Response, &buffer[..len]).await,
        Err(_) => Ok(()),
    }
}

async fn send_hello(socket: &mut TcpSocket<'_>) -> Result<(), ControlError> {
    let mut hello: heapless::Vec<u8, 32> = heapless::Vec::new();
    let complete = hello.push(DEVICE_CLASS_ID).is_ok()
        && hello.extend_from_slice(DEVICE_NAME.as_bytes()).is_ok();
    if !complete {
        return Err(ControlError::Frame(voice_led_core::Error::InvalidFrame));
    }
    send_frame(socket, FrameKind::Hello, &hello).await
}

async fn send_frame(
    socket: &mut TcpSocket<'_>,
    kind: FrameKind,
    payload: &[u8],
) -> Result<(), ControlError> {
    let mut out = [0u8; MAX_FRAME_SIZE];
    let len = frame::encode(kind, payload, &mut out)?;
    socket.write_all(&out[..len]).await.map_err(ControlError::Write)?;
    socket.flush().await.map_err(ControlError::Write)
}

/// Fehler einer Kontroll-Verbindung
///
/// Beendet die Verbindung, der Task nimmt danach die nächste an.
#[derive(Debug)]
enum ControlError {
    Read(tcp::Error),
    Write(tcp::Error),
    Frame(voice_led_core::Error),
}

impl From<voice_led_core::Error> for ControlError {
    fn from(e: voice_led_core::Error) -> Self {
        ControlError::Frame(e)
    }
}

impl defmt::Format for ControlError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            ControlError::Read(e) => defmt::write!(fmt, "Read failed: {}", Debug2Format(e)),
            ControlError::Write(e) => defmt::write!(fmt, "Write failed: {}", Debug2Format(e)),
            ControlError::Frame(e) => defmt::write!(fmt, "Frame error: {}", e),
        }
    }
}
