// Property and simulation tests for the game core.
//
// These drive the pure reducer with generated action sequences and check the
// session invariants after every step. Nothing here touches stable memory.

mod game_properties;
mod offer_properties;
