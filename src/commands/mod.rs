/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint:

- `chat`        - Streaming chat with the SeeSea assistant
- `vessels`     - Vessel traffic statistics for a chokepoint
- `chokepoints` - The chokepoint catalog

These handlers are intentionally small and use the library components.
*/

pub mod chat;
pub mod chokepoints;
pub mod vessels;
