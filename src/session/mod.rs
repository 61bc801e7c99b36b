//! Render requests: plan, composite, export and caption behind one call.

pub(crate) mod render_session;
