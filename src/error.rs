use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("A denomination with strength {0} is already registered")]
    DuplicateStrength(u32),

    #[error("No denomination with strength {0} is registered")]
    UnknownDenomination(u32),

    #[error("A temporary link state needs a duration greater than zero")]
    ZeroDuration,

    #[error("Unknown territory '{0}'")]
    UnknownTerritory(String),

    #[error("Unknown player {0}")]
    UnknownPlayer(usize),

    #[error("Territories '{0}' and '{1}' have the same owner")]
    SameOwner(String, String),

    #[error("Territory '{0}' cannot fight itself")]
    SameTerritory(String),

    #[error("Squad drafted from '{found}' cannot fight for '{expected}'")]
    SquadOrigin { expected: String, found: String },

    #[error("{role} squad has {alive} alive units, allowed 1..={max}")]
    SquadSize {
        role: &'static str,
        alive: usize,
        max: usize,
    },

    #[error("Army holds {available} available strength, {requested} requested")]
    InsufficientStrength { requested: u32, available: u32 },

    #[error("No held denomination can be broken down into strength {0}")]
    CannotDecompose(u32),

    #[error("Registry cannot break strength {upper} into strength {lower} exactly")]
    MalformedRegistry { upper: u32, lower: u32 },

    #[error("Registry has no unit of strength 1, cannot build strength {0}")]
    MissingAtomicUnit(u32),

    #[error("Territories '{0}' and '{1}' are not neighbors")]
    NotNeighbors(String, String),

    #[error("No link between '{0}' and '{1}'")]
    NoLink(String, String),

    #[error("Link state does not allow units to cross")]
    TransferBlocked,

    #[error("'{0}' cannot be reached from '{1}'")]
    Unreachable(String, String),

    #[error("Territory '{territory}' does not belong to player {player}")]
    NotOwner { territory: String, player: usize },

    #[error("Territory '{0}' has no owner")]
    Unowned(String),

    #[error("Territory '{0}' still has defenders")]
    NotConquerable(String),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Unit {0} is not drafted into a squad")]
    UnitNotDrafted(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Binary encoding error: {0}")]
    Bincode(#[from] bincode::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
