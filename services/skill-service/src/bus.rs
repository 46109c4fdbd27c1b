//! MQTT Bus Client
//!
//! Connects to the Hermes broker with `rumqttc`, re-subscribes after every
//! (re)connect and feeds inbound publishes to the [`Router`] one at a time.
//! Outbound messages are queued with `try_publish` so a skill never waits on
//! the broker.

use crate::config::Config;
use calico_core::{BusError, Router, bus::Publisher, topic::SUBSCRIPTIONS};
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};
use tracing::{debug, error, info, warn};

const KEEP_ALIVE: Duration = Duration::from_secs(60);
const REQUEST_CAPACITY: usize = 64;

/// Publishing half of the bus connection.
#[derive(Clone)]
pub struct MqttBus {
    client: AsyncClient,
}

impl MqttBus {
    /// Creates the client and its event loop. Nothing touches the network
    /// until the event loop is polled.
    pub fn connect(config: &Config) -> (Self, EventLoop) {
        let mut options = MqttOptions::new(
            config.mqtt_client_id.clone(),
            config.mqtt_host.clone(),
            config.mqtt_port,
        );
        options.set_keep_alive(KEEP_ALIVE);
        let (client, eventloop) = AsyncClient::new(options, REQUEST_CAPACITY);
        (Self { client }, eventloop)
    }

    fn subscribe_all(&self) {
        for topic in SUBSCRIPTIONS {
            match self.client.try_subscribe(topic, QoS::AtMostOnce) {
                Ok(()) => info!(%topic, "Subscribed"),
                Err(e) => error!(%topic, error = %e, "Failed to subscribe"),
            }
        }
    }

    /// Drives the connection until the task is cancelled. Poll errors are
    /// logged and retried after `reconnect_delay`.
    pub async fn run(&self, mut eventloop: EventLoop, router: Router, reconnect_delay: Duration) {
        let router = Arc::new(Mutex::new(router));
        loop {
            match eventloop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                    info!(code = ?ack.code, "Connected to MQTT Broker!");
                    self.subscribe_all();
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    let router = Arc::clone(&router);
                    let topic = publish.topic;
                    let payload = publish.payload;
                    debug!(%topic, bytes = payload.len(), "Received message");
                    let dispatched = tokio::task::spawn_blocking(move || {
                        let mut router = router.lock().unwrap_or_else(PoisonError::into_inner);
                        router.dispatch(&topic, &payload)
                    })
                    .await;
                    match dispatched {
                        Ok(outcome) => debug!(?outcome, "Dispatch finished"),
                        Err(e) => error!(error = %e, "Dispatch task failed"),
                    }
                }
                Ok(Event::Incoming(Packet::Disconnect)) => {
                    warn!("Broker closed the connection.");
                }
                Ok(_) => {}
                Err(e) => {
                    error!(
                        error = %e,
                        retry_in_secs = reconnect_delay.as_secs(),
                        "Connection to MQTT broker failed. Retrying..."
                    );
                    tokio::time::sleep(reconnect_delay).await;
                }
            }
        }
    }
}

impl Publisher for MqttBus {
    fn publish(&self, topic: &str, payload: &str) -> Result<(), BusError> {
        self.client
            .try_publish(topic, QoS::AtMostOnce, false, payload.as_bytes().to_vec())
            .map_err(|e| BusError::Publish {
                topic: topic.to_string(),
                message: e.to_string(),
            })
    }
}
