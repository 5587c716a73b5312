//! RADIUS Protocol Codec
//!
//! This crate implements the wire layer of a RADIUS authentication server
//! as defined in RFC 2865.
//!
//! # Features
//!
//! - Packet encoding and decoding with explicit length framing
//! - Type-length-value attribute lists, including unknown attribute types
//! - Response Authenticator calculation
//! - MD5-based User-Password hiding and recovery
//!
//! # Example
//!
//! ```rust
//! use radius_codec::{Attributes, AttributeType, Code, Packet};
//! use radius_codec::auth::{generate_request_authenticator, verify_response_authenticator};
//! use radius_codec::password::{decrypt_user_password, encrypt_user_password};
//!
//! let secret = b"secret";
//! let req_auth = generate_request_authenticator();
//!
//! // Build an Access-Request
//! let mut attrs = Attributes::new();
//! attrs.add(AttributeType::UserName as u8, "alice");
//! attrs.add(
//!     AttributeType::UserPassword as u8,
//!     encrypt_user_password(b"password", secret, &req_auth).unwrap(),
//! );
//! let request = Packet::with_attributes(Code::AccessRequest, 1, req_auth, &attrs).unwrap();
//! let bytes = request.encode().unwrap();
//!
//! // Server side: decode, recover the password, answer
//! let received = Packet::decode(&bytes, bytes.len()).unwrap();
//! let hidden = received.decoded_attributes().unwrap();
//! let password = decrypt_user_password(
//!     hidden.get(AttributeType::UserPassword as u8).unwrap(),
//!     secret,
//!     &received.authenticator,
//! )
//! .unwrap();
//! assert_eq!(password, b"password");
//!
//! let reply = Packet::access_accept(&received, secret);
//! assert!(verify_response_authenticator(&reply, &req_auth, secret));
//! ```

pub mod attributes;
pub mod auth;
pub mod packet;
pub mod password;

pub use attributes::{encode_attributes, Attribute, AttributeType, Attributes};
pub use auth::{
    calculate_response_authenticator, generate_request_authenticator,
    verify_response_authenticator,
};
pub use packet::{Code, Packet, PacketError};
pub use password::{decrypt_user_password, encrypt_user_password, PasswordError};
