use std::fmt;

/// RADIUS packet codes as assigned by RFC 2865 Section 4 and the IANA registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Code {
    /// Access-Request (1)
    AccessRequest = 1,
    /// Access-Accept (2)
    AccessAccept = 2,
    /// Access-Reject (3)
    AccessReject = 3,
    /// Accounting-Request (4) - RFC 2866
    AccountingRequest = 4,
    /// Accounting-Response (5) - RFC 2866
    AccountingResponse = 5,
    /// Accounting-Status (6)
    AccountingStatus = 6,
    /// Password-Request (7)
    PasswordRequest = 7,
    /// Password-Ack (8)
    PasswordAck = 8,
    /// Password-Reject (9)
    PasswordReject = 9,
    /// Accounting-Message (10)
    AccountingMessage = 10,
    /// Access-Challenge (11)
    AccessChallenge = 11,
    /// Status-Server (12)
    StatusServer = 12,
    /// Status-Client (13)
    StatusClient = 13,
    ResourceFreeRequest = 21,
    ResourceFreeResponse = 22,
    ResourceQueryRequest = 23,
    ResourceQueryResponse = 24,
    AlternateResourceReclaimRequest = 25,
    NasRebootRequest = 26,
    NasRebootResponse = 27,
    NextPasscode = 29,
    NewPin = 30,
    TerminateSession = 31,
    PasswordExpired = 32,
    EventRequest = 33,
    EventResponse = 34,
    /// Disconnect-Request (40) - RFC 5176
    DisconnectRequest = 40,
    DisconnectAck = 41,
    DisconnectNak = 42,
    /// CoA-Request (43) - RFC 5176
    CoaRequest = 43,
    CoaAck = 44,
    CoaNak = 45,
    IpAddressAllocate = 50,
    IpAddressRelease = 51,
}

impl Code {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Code::AccessRequest),
            2 => Some(Code::AccessAccept),
            3 => Some(Code::AccessReject),
            4 => Some(Code::AccountingRequest),
            5 => Some(Code::AccountingResponse),
            6 => Some(Code::AccountingStatus),
            7 => Some(Code::PasswordRequest),
            8 => Some(Code::PasswordAck),
            9 => Some(Code::PasswordReject),
            10 => Some(Code::AccountingMessage),
            11 => Some(Code::AccessChallenge),
            12 => Some(Code::StatusServer),
            13 => Some(Code::StatusClient),
            21 => Some(Code::ResourceFreeRequest),
            22 => Some(Code::ResourceFreeResponse),
            23 => Some(Code::ResourceQueryRequest),
            24 => Some(Code::ResourceQueryResponse),
            25 => Some(Code::AlternateResourceReclaimRequest),
            26 => Some(Code::NasRebootRequest),
            27 => Some(Code::NasRebootResponse),
            29 => Some(Code::NextPasscode),
            30 => Some(Code::NewPin),
            31 => Some(Code::TerminateSession),
            32 => Some(Code::PasswordExpired),
            33 => Some(Code::EventRequest),
            34 => Some(Code::EventResponse),
            40 => Some(Code::DisconnectRequest),
            41 => Some(Code::DisconnectAck),
            42 => Some(Code::DisconnectNak),
            43 => Some(Code::CoaRequest),
            44 => Some(Code::CoaAck),
            45 => Some(Code::CoaNak),
            50 => Some(Code::IpAddressAllocate),
            51 => Some(Code::IpAddressRelease),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Registered name of the code, e.g. `Access-Request`
    pub fn name(self) -> &'static str {
        match self {
            Code::AccessRequest => "Access-Request",
            Code::AccessAccept => "Access-Accept",
            Code::AccessReject => "Access-Reject",
            Code::AccountingRequest => "Accounting-Request",
            Code::AccountingResponse => "Accounting-Response",
            Code::AccountingStatus => "Accounting-Status",
            Code::PasswordRequest => "Password-Request",
            Code::PasswordAck => "Password-Ack",
            Code::PasswordReject => "Password-Reject",
            Code::AccountingMessage => "Accounting-Message",
            Code::AccessChallenge => "Access-Challenge",
            Code::StatusServer => "Status-Server",
            Code::StatusClient => "Status-Client",
            Code::ResourceFreeRequest => "Resource-Free-Request",
            Code::ResourceFreeResponse => "Resource-Free-Response",
            Code::ResourceQueryRequest => "Resource-Query-Request",
            Code::ResourceQueryResponse => "Resource-Query-Response",
            Code::AlternateResourceReclaimRequest => "Alternate-Resource-Reclaim-Request",
            Code::NasRebootRequest => "NAS-Reboot-Request",
            Code::NasRebootResponse => "NAS-Reboot-Response",
            Code::NextPasscode => "Next-Passcode",
            Code::NewPin => "New-Pin",
            Code::TerminateSession => "Terminate-Session",
            Code::PasswordExpired => "Password-Expired",
            Code::EventRequest => "Event-Request",
            Code::EventResponse => "Event-Response",
            Code::DisconnectRequest => "Disconnect-Request",
            Code::DisconnectAck => "Disconnect-ACK",
            Code::DisconnectNak => "Disconnect-NAK",
            Code::CoaRequest => "CoA-Request",
            Code::CoaAck => "CoA-ACK",
            Code::CoaNak => "CoA-NAK",
            Code::IpAddressAllocate => "IP-Address-Allocate",
            Code::IpAddressRelease => "IP-Address-Release",
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
