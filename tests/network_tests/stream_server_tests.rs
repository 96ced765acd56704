//! Stream Server Tests
//!
//! Tests verify:
//! - Line-per-request, line-per-response framing
//! - Commands on one connection are applied in order
//! - Connections are isolated from each other
//! - Connection cap, read timeout and shutdown
//! - Timeouts and resets are logged as warnings naming the peer

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use twinkv::audit::Direction;
use twinkv::network::StreamClient;
use twinkv::{Dispatcher, ServerConfig};

use crate::common::{client_config, loopback_config, start_stream, wait_until};

// =============================================================================
// Framing Tests
// =============================================================================

#[test]
fn test_request_response_roundtrip() {
    let running = start_stream(loopback_config(), Arc::new(Dispatcher::new()));
    let mut client = StreamClient::connect(running.addr, &client_config(2000)).unwrap();
    assert_eq!(client.server_addr(), running.addr);

    assert_eq!(client.request("PUT color blue").unwrap(), "Operation successful.");
    assert_eq!(client.request("GET color").unwrap(), "blue");
    assert_eq!(client.request("DELETE color").unwrap(), "Operation successful.");
    assert_eq!(client.request("GET color").unwrap(), "No record found.");
}

#[test]
fn test_protocol_errors_keep_connection_open() {
    let running = start_stream(loopback_config(), Arc::new(Dispatcher::new()));
    let mut client = StreamClient::connect(running.addr, &client_config(2000)).unwrap();

    assert_eq!(client.request("GET").unwrap(), "Sample Usage: GET <key>");
    assert_eq!(client.request("PUT onlykey").unwrap(), "Sample Usage: PUT <key> <value>");
    assert_eq!(client.request("DELETE").unwrap(), "Sample Usage: DELETE <key>");
    assert_eq!(client.request("FOO bar").unwrap(), "Invalid Command.");
    assert_eq!(client.request("").unwrap(), "Invalid Command.");
    assert_eq!(client.request("GET onlykey").unwrap(), "No record found.");
}

#[test]
fn test_pipelined_requests_answered_in_order() {
    let running = start_stream(loopback_config(), Arc::new(Dispatcher::new()));

    let mut stream = TcpStream::connect(running.addr).unwrap();
    stream.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
    stream
        .write_all(b"PUT k 1\r\nPUT k 2\nGET k\nPUT k 3 4\nGET k\n")
        .unwrap();

    let mut reader = BufReader::new(stream);
    let responses: Vec<String> = (0..5)
        .map(|_| {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            line
        })
        .collect();

    assert_eq!(
        responses,
        vec![
            "Operation successful.\n",
            "Operation successful.\n",
            "2\n",
            "Operation successful.\n",
            "3 4\n",
        ]
    );
}

#[test]
fn test_final_line_without_newline_is_served() {
    let running = start_stream(loopback_config(), Arc::new(Dispatcher::new()));

    let mut stream = TcpStream::connect(running.addr).unwrap();
    stream.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
    stream.write_all(b"GET nothing").unwrap();
    stream.shutdown(std::net::Shutdown::Write).unwrap();

    let mut response = String::new();
    BufReader::new(stream).read_line(&mut response).unwrap();

    assert_eq!(response, "No record found.\n");
}

#[test]
fn test_audit_records_both_directions() {
    let running = start_stream(loopback_config(), Arc::new(Dispatcher::new()));
    let mut client = StreamClient::connect(running.addr, &client_config(2000)).unwrap();

    client.request("GET color").unwrap();

    let request = running.audit.recv_timeout(Duration::from_secs(2)).unwrap();
    let response = running.audit.recv_timeout(Duration::from_secs(2)).unwrap();

    assert_eq!(request.direction, Direction::Request);
    assert_eq!(request.text, "GET color");
    assert_eq!(response.direction, Direction::Response);
    assert_eq!(response.text, "No record found.");
    assert_eq!(request.peer, response.peer);
}

// =============================================================================
// Isolation / Concurrency Tests
// =============================================================================

#[test]
fn test_connections_share_one_store() {
    let running = start_stream(loopback_config(), Arc::new(Dispatcher::new()));
    let mut writer = StreamClient::connect(running.addr, &client_config(2000)).unwrap();
    let mut reader = StreamClient::connect(running.addr, &client_config(2000)).unwrap();

    writer.request("PUT shared yes").unwrap();

    assert_eq!(reader.request("GET shared").unwrap(), "yes");
}

#[test]
fn test_idle_client_does_not_block_others() {
    let running = start_stream(loopback_config(), Arc::new(Dispatcher::new()));

    // Connected but never sends anything
    let _idle = TcpStream::connect(running.addr).unwrap();

    let mut active = StreamClient::connect(running.addr, &client_config(2000)).unwrap();
    assert_eq!(active.request("PUT a b").unwrap(), "Operation successful.");
}

#[test]
fn test_abrupt_disconnect_does_not_affect_others() {
    let running = start_stream(loopback_config(), Arc::new(Dispatcher::new()));

    {
        let mut rude = TcpStream::connect(running.addr).unwrap();
        rude.write_all(b"PUT half").unwrap();
    }

    let mut client = StreamClient::connect(running.addr, &client_config(2000)).unwrap();
    assert_eq!(client.request("PUT k v").unwrap(), "Operation successful.");
    assert_eq!(client.request("GET k").unwrap(), "v");
}

#[test]
fn test_concurrent_puts_same_key() {
    let dispatcher = Arc::new(Dispatcher::new());
    let running = start_stream(loopback_config(), Arc::clone(&dispatcher));
    let addr = running.addr;

    let handles: Vec<_> = ["v1", "v2"]
        .into_iter()
        .map(|value| {
            thread::spawn(move || {
                let mut client = StreamClient::connect(addr, &client_config(2000)).unwrap();
                for _ in 0..50 {
                    assert_eq!(
                        client.request(&format!("PUT race {}", value)).unwrap(),
                        "Operation successful."
                    );
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let mut client = StreamClient::connect(addr, &client_config(2000)).unwrap();
    let value = client.request("GET race").unwrap();
    assert!(value == "v1" || value == "v2", "unexpected value {}", value);
}

#[test]
fn test_many_clients_distinct_keys() {
    let dispatcher = Arc::new(Dispatcher::new());
    let running = start_stream(loopback_config(), Arc::clone(&dispatcher));
    let addr = running.addr;

    let handles: Vec<_> = (0..8)
        .map(|t| {
            thread::spawn(move || {
                let mut client = StreamClient::connect(addr, &client_config(2000)).unwrap();
                for i in 0..20 {
                    client.request(&format!("PUT c{}_{} {}", t, i, i)).unwrap();
                    assert_eq!(client.request(&format!("GET c{}_{}", t, i)).unwrap(), i.to_string());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(dispatcher.store().len(), 160);
}

// =============================================================================
// Limits / Lifecycle Tests
// =============================================================================

#[test]
fn test_connection_limit_rejects_excess() {
    let config = ServerConfig::builder()
        .host("127.0.0.1")
        .port(0)
        .max_connections(1)
        .build();
    let running = start_stream(config, Arc::new(Dispatcher::new()));

    let mut first = StreamClient::connect(running.addr, &client_config(2000)).unwrap();
    assert_eq!(first.request("PUT a 1").unwrap(), "Operation successful.");
    assert_eq!(running.server.active_connections(), 1);

    let mut second = StreamClient::connect(running.addr, &client_config(500)).unwrap();
    assert!(second.request("GET a").is_err());

    // First connection is unaffected
    assert_eq!(first.request("GET a").unwrap(), "1");

    drop(first);
    assert!(wait_until(|| running.server.active_connections() == 0));

    let mut third = StreamClient::connect(running.addr, &client_config(2000)).unwrap();
    assert_eq!(third.request("GET a").unwrap(), "1");
}

#[test]
fn test_read_timeout_closes_idle_connection() {
    let config = ServerConfig::builder()
        .host("127.0.0.1")
        .port(0)
        .read_timeout_ms(100)
        .build();
    let running = start_stream(config, Arc::new(Dispatcher::new()));

    let mut stream = TcpStream::connect(running.addr).unwrap();
    stream.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
    let local = stream.local_addr().unwrap();
    stream.write_all(b"PUT a 1\n").unwrap();

    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut response = String::new();
    reader.read_line(&mut response).unwrap();
    assert_eq!(response, "Operation successful.\n");

    assert!(wait_until(|| running.server.active_connections() == 0));
    assert!(wait_until(|| {
        running.logs.count("WARN", &format!("Read timeout for client {}", local)) == 1
    }));

    // Server side is closed: end of stream
    let mut rest = String::new();
    assert_eq!(reader.read_line(&mut rest).unwrap(), 0);
}

#[test]
fn test_connection_reset_is_logged_as_warning() {
    let running = start_stream(loopback_config(), Arc::new(Dispatcher::new()));

    let local = {
        let mut stream = TcpStream::connect(running.addr).unwrap();
        let local = stream.local_addr().unwrap();
        stream.write_all(&b"GET k\n".repeat(2000)).unwrap();

        // Let the responses pile up unread so closing resets the connection
        thread::sleep(Duration::from_millis(200));
        local
    };

    let needle = format!("Server exception on connection {}", local);
    assert!(wait_until(|| running.logs.count("WARN", &needle) == 1));
    assert!(wait_until(|| running.server.active_connections() == 0));

    let mut client = StreamClient::connect(running.addr, &client_config(2000)).unwrap();
    assert_eq!(client.request("GET k").unwrap(), "No record found.");
}

#[test]
fn test_worker_logs_reach_server_subscriber() {
    let running = start_stream(loopback_config(), Arc::new(Dispatcher::new()));

    let mut client = StreamClient::connect(running.addr, &client_config(2000)).unwrap();
    client.request("GET k").unwrap();
    drop(client);

    assert!(wait_until(|| running.logs.count("DEBUG", "Connection established from") == 1));
    assert!(wait_until(|| running.logs.count("DEBUG", "disconnected") == 1));
    assert_eq!(running.logs.count("WARN", ""), 0);
}

#[test]
fn test_shutdown_stops_accept_loop() {
    let running = start_stream(loopback_config(), Arc::new(Dispatcher::new()));
    let addr = running.addr;
    let handle = running.handle.clone();

    running.stop().unwrap();
    assert!(handle.is_shutdown());

    assert!(StreamClient::connect(addr, &client_config(500))
        .and_then(|mut client| client.request("GET a"))
        .is_err());
}

#[test]
fn test_bind_conflict_is_reported() {
    let running = start_stream(loopback_config(), Arc::new(Dispatcher::new()));

    let config = ServerConfig::builder()
        .host("127.0.0.1")
        .port(running.addr.port())
        .build();
    let result = twinkv::network::StreamServer::bind(
        config,
        Arc::new(Dispatcher::new()),
        Arc::new(twinkv::audit::TracingAudit),
    );

    assert!(matches!(result, Err(twinkv::KvError::Bind { .. })));
}
