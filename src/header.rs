//! FINS addressing fields and node addressing.
//!
//! Every non-connect frame carries an 8-byte addressing block right after the
//! command-class marker. It routes the command between nodes on a FINS network:
//!
//! | Byte | Field | Description |
//! |------|-------|-------------|
//! | 0 | GCT | Permissible gateway count |
//! | 1 | DNA | Destination Network Address |
//! | 2 | DA1 | Destination Node Address |
//! | 3 | DA2 | Destination Unit Address |
//! | 4 | SNA | Source Network Address |
//! | 5 | SA1 | Source Node Address |
//! | 6 | SA2 | Source Unit Address |
//! | 7 | SID | Source (service) ID |
//!
//! # Example
//!
//! ```
//! use fins_frame::{FinsHeader, NodeAddress};
//!
//! let source = NodeAddress::new(0, 1, 0);
//! let destination = NodeAddress::new(0, 10, 0);
//!
//! let header = FinsHeader::new(destination, source, 0x01);
//! assert_eq!(header.to_bytes(), [0x02, 0x00, 0x0A, 0x00, 0x00, 0x01, 0x00, 0x01]);
//! ```

use crate::error::{FinsError, Result};

/// Size of the addressing block in bytes.
pub const FINS_HEADER_SIZE: usize = 8;

/// Information Control Field of a command that expects a response.
pub const ICF_COMMAND: u8 = 0x80;
/// Reserved byte following the ICF.
pub const RSV: u8 = 0x00;
/// Control bytes (ICF, RSV) optionally emitted before the addressing block.
pub const CONTROL_BYTES: [u8; 2] = [ICF_COMMAND, RSV];

/// Default permissible gateway count.
pub const DEFAULT_GCT: u8 = 0x02;
/// Default destination network address (local network).
pub const DEFAULT_DNA: u8 = 0x00;
/// Default destination node address.
pub const DEFAULT_DA1: u8 = 0x00;
/// Default destination unit address (CPU unit).
pub const DEFAULT_DA2: u8 = 0x00;
/// Default source network address (local network).
pub const DEFAULT_SNA: u8 = 0x00;
/// Default source node address.
pub const DEFAULT_SA1: u8 = 0x00;
/// Default source unit address.
pub const DEFAULT_SA2: u8 = 0x00;
/// Default source ID.
pub const DEFAULT_SID: u8 = 0x00;

/// Node address for FINS communication.
///
/// Represents a network/node/unit triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeAddress {
    /// Network address (0 = local network).
    pub network: u8,
    /// Node address.
    pub node: u8,
    /// Unit address (0 = CPU unit).
    pub unit: u8,
}

impl NodeAddress {
    /// Creates a new node address.
    ///
    /// # Example
    ///
    /// ```
    /// use fins_frame::NodeAddress;
    ///
    /// let remote = NodeAddress::new(1, 10, 0);
    /// assert_eq!(remote.node, 10);
    /// ```
    pub fn new(network: u8, node: u8, unit: u8) -> Self {
        Self {
            network,
            node,
            unit,
        }
    }

    /// Creates a local node address (network 0, node 0, unit 0).
    pub fn local() -> Self {
        Self::new(0, 0, 0)
    }
}

/// The 8 single-byte addressing fields of a command frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FinsHeader {
    /// Permissible gateway count (number of bridges a frame may cross).
    pub gct: u8,
    /// Destination Network Address.
    pub dna: u8,
    /// Destination Node Address.
    pub da1: u8,
    /// Destination Unit Address.
    pub da2: u8,
    /// Source Network Address.
    pub sna: u8,
    /// Source Node Address.
    pub sa1: u8,
    /// Source Unit Address.
    pub sa2: u8,
    /// Source ID, echoed back by the controller in its response.
    pub sid: u8,
}

impl FinsHeader {
    /// Creates addressing fields from a destination, a source and a source ID.
    ///
    /// The gateway count is set to [`DEFAULT_GCT`].
    pub fn new(destination: NodeAddress, source: NodeAddress, sid: u8) -> Self {
        Self {
            gct: DEFAULT_GCT,
            dna: destination.network,
            da1: destination.node,
            da2: destination.unit,
            sna: source.network,
            sa1: source.node,
            sa2: source.unit,
            sid,
        }
    }

    /// Serializes the addressing fields in wire order.
    pub fn to_bytes(self) -> [u8; FINS_HEADER_SIZE] {
        [
            self.gct, self.dna, self.da1, self.da2, self.sna, self.sa1, self.sa2, self.sid,
        ]
    }

    /// Parses addressing fields from bytes.
    ///
    /// # Errors
    ///
    /// Returns `FinsError::InvalidParameter` if the slice is shorter than
    /// [`FINS_HEADER_SIZE`].
    ///
    /// # Example
    ///
    /// ```
    /// use fins_frame::FinsHeader;
    ///
    /// let bytes = [0x02, 0x00, 0x01, 0x00, 0x00, 0x0A, 0x00, 0x01];
    /// let header = FinsHeader::from_bytes(&bytes).unwrap();
    /// assert_eq!(header.sa1, 0x0A);
    /// ```
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < FINS_HEADER_SIZE {
            return Err(FinsError::invalid_parameter(
                "data",
                format!(
                    "addressing block too short: expected {} bytes, got {}",
                    FINS_HEADER_SIZE,
                    data.len()
                ),
            ));
        }

        Ok(Self {
            gct: data[0],
            dna: data[1],
            da1: data[2],
            da2: data[3],
            sna: data[4],
            sa1: data[5],
            sa2: data[6],
            sid: data[7],
        })
    }

    /// Returns the destination node address.
    pub fn destination(self) -> NodeAddress {
        NodeAddress::new(self.dna, self.da1, self.da2)
    }

    /// Returns the source node address.
    pub fn source(self) -> NodeAddress {
        NodeAddress::new(self.sna, self.sa1, self.sa2)
    }
}

impl Default for FinsHeader {
    fn default() -> Self {
        Self {
            gct: DEFAULT_GCT,
            dna: DEFAULT_DNA,
            da1: DEFAULT_DA1,
            da2: DEFAULT_DA2,
            sna: DEFAULT_SNA,
            sa1: DEFAULT_SA1,
            sa2: DEFAULT_SA2,
            sid: DEFAULT_SID,
        }
    }
}
