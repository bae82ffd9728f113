//! End to end: sign in, discover devices, build entities, call services.

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;
use serde_json::Value;

use smarterd::client::ClientError;
use smarterd::client::LoginSession;
use smarterd::client::Network;
use smarterd::client::User;
use smarterd::device::CommandSink;
use smarterd::device::CommandSpec;
use smarterd::device::DeviceHandle;
use smarterd::device::DeviceSpec;
use smarterd::entity::SmarterEntity;
use smarterd::platform;
use smarterd::DeviceRegistry;
use smarterd::DeviceSet;
use smarterd::EntityKind;
use smarterd::ServiceCall;
use smarterd::SmarterClient;
use smarterd::SmarterHub;

#[derive(Default)]
struct Sink {
    sent: Mutex<Vec<(String, String, Value)>>,
}

#[async_trait]
impl CommandSink for Sink {
    async fn send_command(
        &self,
        device_id: &str,
        name: &str,
        value: Value,
    ) -> Result<Value, ClientError> {
        self.sent
            .lock()
            .unwrap()
            .push((device_id.to_string(), name.to_string(), value));
        Ok(Value::Bool(true))
    }
}

struct Cloud {
    sink: Arc<Sink>,
}

fn command(name: &str, example: Value) -> CommandSpec {
    CommandSpec {
        name: name.to_string(),
        example,
    }
}

#[async_trait]
impl SmarterClient for Cloud {
    async fn sign_in(&self, _username: &str, _password: &str) -> Result<LoginSession, ClientError> {
        Ok(LoginSession {
            local_id: "user-1".to_string(),
            refresh_token: "refresh-1".to_string(),
        })
    }

    async fn sign_in_with_refresh_token(
        &self,
        _refresh_token: &str,
    ) -> Result<LoginSession, ClientError> {
        Err(ClientError::InvalidAuth)
    }

    async fn fetch_user(&self, session: &LoginSession) -> Result<User, ClientError> {
        Ok(User {
            identifier: session.local_id.clone(),
            networks: vec![Network {
                id: "net-1".to_string(),
                name: "Home".to_string(),
            }],
        })
    }

    async fn load_network_devices(
        &self,
        _network: &Network,
        _owner_id: &str,
    ) -> Result<Vec<DeviceHandle>, ClientError> {
        let kettle = DeviceSpec {
            id: "kettle-1".to_string(),
            device_type: "kettle".to_string(),
            model: "SMKET01".to_string(),
            friendly_name: "Kitchen Kettle".to_string(),
            firmware_version: Some("1.2.3".to_string()),
            commands: vec![
                command("start_boil", Value::Bool(true)),
                command("stop_boil", Value::Bool(true)),
                command("start_auto_boil", Value::Bool(true)),
                command("set_boil_temperature", json!(100)),
                command("set_keep_warm_time", json!(20)),
            ],
        };
        let coffee = DeviceSpec {
            id: "coffee-1".to_string(),
            device_type: "coffee".to_string(),
            model: "SMCOF01".to_string(),
            friendly_name: "Kitchen Coffee".to_string(),
            firmware_version: None,
            commands: vec![
                command("start_boil", Value::Bool(true)),
                command("stop_boil", Value::Bool(true)),
                command("start_auto_boil", Value::Bool(true)),
                command("set_boil_temperature", json!(100)),
            ],
        };
        Ok(vec![
            DeviceHandle::new(kettle, self.sink.clone()),
            DeviceHandle::new(coffee, self.sink.clone()),
        ])
    }
}

#[tokio::test]
async fn discover_build_and_dispatch() {
    let sink = Arc::new(Sink::default());
    let cloud = Cloud { sink: sink.clone() };

    // Stale refresh token: the hub retries with the password.
    let hub = SmarterHub::sign_in(cloud, "me@example.com", "hunter2", Some("stale"))
        .await
        .unwrap();
    let devices = DeviceSet::new(hub.discover_devices().await.unwrap());
    assert_eq!(devices.len(), 2);

    let configs = DeviceRegistry::builtin().unwrap();
    let platform = platform::setup(&devices, &configs);

    // 13 kettle entities plus 13 coffee entities.
    assert_eq!(platform.entities.len(), 26);
    assert!(platform
        .entities
        .iter()
        .any(|e| e.unique_id() == "kettle-1-kettle-number_boil_temperature"));

    // A status push is visible through the matching entity adapter.
    devices
        .get("kettle-1")
        .unwrap()
        .update_status(json!({"state": "Boiling", "water_level": 80}));
    let boiling = platform
        .entities
        .iter()
        .find_map(|e| match e {
            SmarterEntity::BinarySensor(b)
                if e.unique_id() == "kettle-1-kettle-binary_sensor_boiling" =>
            {
                Some(b)
            }
            _ => None,
        })
        .unwrap();
    assert_eq!(boiling.is_on(), Some(true));

    // send_command reaches the device through the service layer.
    let call = ServiceCall {
        device_id: vec!["kettle-1".to_string()],
        command_name: Some("set_boil_temperature".to_string()),
        command_data_number: Some(95.0),
        ..Default::default()
    };
    platform
        .services
        .handle("send_command", &call)
        .await
        .unwrap();

    // Both families declare quick_boil.
    let quick = ServiceCall {
        device_id: vec!["kettle-1".to_string()],
        ..Default::default()
    };
    platform.services.handle("quick_boil", &quick).await.unwrap();

    let quick_coffee = ServiceCall {
        device_id: vec!["coffee-1".to_string()],
        ..Default::default()
    };
    platform
        .services
        .handle("quick_boil", &quick_coffee)
        .await
        .unwrap();

    let sent = sink.sent.lock().unwrap().clone();
    assert_eq!(
        sent,
        vec![
            (
                "kettle-1".to_string(),
                "set_boil_temperature".to_string(),
                json!(95.0)
            ),
            (
                "kettle-1".to_string(),
                "start_auto_boil".to_string(),
                json!(true)
            ),
            (
                "coffee-1".to_string(),
                "start_auto_boil".to_string(),
                json!(true)
            ),
        ]
    );

    // Unknown targets are reported per device, not raised.
    let partial = ServiceCall {
        device_id: vec!["kettle-9".to_string(), "coffee-1".to_string()],
        ..Default::default()
    };
    let response = platform
        .services
        .handle("get_commands", &partial)
        .await
        .unwrap();
    assert_eq!(response["kettle-9"], json!("not found"));
    assert!(response["coffee-1"]
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c["name"] == json!("start_auto_boil")));

    // Both families contribute number entities.
    let numbers: Vec<String> = platform
        .entities
        .iter()
        .filter(|e| e.kind() == EntityKind::Number)
        .map(|e| e.unique_id())
        .collect();
    assert!(numbers.contains(&"coffee-1-coffee-number_keep_warm_time".to_string()));

    // Entity subscriptions observe later pushes.
    let water_level = platform
        .entities
        .iter()
        .find_map(|e| match e {
            SmarterEntity::Sensor(s)
                if e.unique_id() == "kettle-1-kettle-sensor_water_level" =>
            {
                Some(s)
            }
            _ => None,
        })
        .unwrap();
    let mut subscription = water_level.base().subscribe();
    devices
        .get("kettle-1")
        .unwrap()
        .update_status(json!({"state": "Cooling", "water_level": 55}));
    assert!(subscription.changed().await);
    assert_eq!(water_level.native_value(), Some(json!(55)));
}
