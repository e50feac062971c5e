/// The connect sequence's state machine, per §4.7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectState {
    Disconnected,
    Opening,
    AwaitingDeviceKey,
    AwaitingHandshakeAck,
    Authenticated,
}
