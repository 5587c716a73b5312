use radius_codec::{
    auth::{generate_request_authenticator, verify_response_authenticator},
    password::encrypt_user_password,
    AttributeType, Attributes, Code, Packet,
};
use std::net::UdpSocket;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 4 {
        eprintln!("Usage: {} <username> <password> <secret> [server_addr]", args[0]);
        eprintln!("Example: {} admin admin123 testing123 127.0.0.1:1812", args[0]);
        std::process::exit(1);
    }

    let username = &args[1];
    let password = &args[2];
    let secret = args[3].as_bytes();
    let server_addr = args.get(4).map(|s| s.as_str()).unwrap_or("127.0.0.1:1812");

    println!("RADIUS Client Test");
    println!("==================");
    println!("Server: {}", server_addr);
    println!("Username: {}", username);
    println!();

    // Create UDP socket
    let socket = UdpSocket::bind("0.0.0.0:0")?;
    socket.connect(server_addr)?;

    // Generate request authenticator
    let request_auth = generate_request_authenticator();

    let mut attrs = Attributes::new();
    attrs.add(AttributeType::UserName as u8, username.as_bytes());
    attrs.add(
        AttributeType::UserPassword as u8,
        encrypt_user_password(password.as_bytes(), secret, &request_auth)?,
    );
    attrs.add(AttributeType::NasIpAddress as u8, [127u8, 0, 0, 1]);

    let packet = Packet::with_attributes(Code::AccessRequest, 1, request_auth, &attrs)?;

    // Encode and send packet
    let request_data = packet.encode()?;
    println!("Sending Access-Request ({} bytes)...", request_data.len());
    socket.send(&request_data)?;

    // Receive response
    let mut buffer = vec![0u8; Packet::MAX_PACKET_SIZE];
    socket.set_read_timeout(Some(std::time::Duration::from_secs(5)))?;

    match socket.recv(&mut buffer) {
        Ok(len) => {
            println!("Received response ({} bytes)", len);

            let response = Packet::decode(&buffer, len)?;

            if !verify_response_authenticator(&response, &request_auth, secret) {
                println!("\nResponse Authenticator does not match, check the shared secret");
            }

            match response.code {
                Code::AccessAccept => {
                    println!("\nAuthentication SUCCESSFUL!");
                    println!("  Response: Access-Accept");
                }
                Code::AccessReject => {
                    println!("\nAuthentication FAILED!");
                    println!("  Response: Access-Reject");
                }
                other => {
                    println!("\nUnexpected response: {}", other);
                }
            }

            println!("\nResponse Details:");
            println!("  Identifier: {}", response.identifier);
            println!("  Length: {}", response.length);

            Ok(())
        }
        Err(e) => {
            eprintln!("\nNo response from server: {}", e);
            eprintln!("  Make sure the RADIUS server is running on {}", server_addr);
            Err(e.into())
        }
    }
}
