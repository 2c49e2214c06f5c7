//! Scheduler subprotocol: firmware-side task scheduling.

use crate::constants::*;
use crate::numeric::{pack7, unpack7};

/// One scheduled task's full detail, as returned by the long form of
/// `QUERY_ONE_REPLY`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInfo {
    pub time_ms: u32,
    pub len: u16,
    pub position: u16,
    pub messages: Vec<u8>,
}

/// A decoded scheduler reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerReply {
    Error { task_id: u8 },
    QueryAllReply { task_ids: Vec<u8> },
    /// `task` is `None` for the short form (payload length 1): the id with
    /// no task body, e.g. because the id does not name a live task.
    QueryOneReply { task_id: u8, task: Option<TaskInfo> },
    Other { subcmd: u8, data: Vec<u8> },
}

/// Dispatches an already-unwrapped `SCHEDULER_DATA` payload.
#[must_use]
pub fn dispatch(payload: &[u8]) -> SchedulerReply {
    let Some(&subcmd) = payload.get(1) else {
        return SchedulerReply::Other {
            subcmd: 0,
            data: Vec::new(),
        };
    };
    let body = payload.get(2..).unwrap_or(&[]);

    match subcmd {
        SCHEDULER_ERROR => SchedulerReply::Error {
            task_id: body.first().copied().unwrap_or(0),
        },
        SCHEDULER_QUERY_ALL_REPLY => SchedulerReply::QueryAllReply {
            task_ids: body.to_vec(),
        },
        SCHEDULER_QUERY_ONE_REPLY => {
            let Some(&task_id) = body.first() else {
                return SchedulerReply::QueryOneReply {
                    task_id: 0,
                    task: None,
                };
            };
            if body.len() <= 1 {
                return SchedulerReply::QueryOneReply { task_id, task: None };
            }
            let unpacked = unpack7(&body[1..]);
            if unpacked.len() < 8 {
                return SchedulerReply::QueryOneReply { task_id, task: None };
            }
            let time_ms = u32::from_le_bytes([unpacked[0], unpacked[1], unpacked[2], unpacked[3]]);
            let len = u16::from_le_bytes([unpacked[4], unpacked[5]]);
            let position = u16::from_le_bytes([unpacked[6], unpacked[7]]);
            let messages = unpacked[8..].to_vec();
            SchedulerReply::QueryOneReply {
                task_id,
                task: Some(TaskInfo {
                    time_ms,
                    len,
                    position,
                    messages,
                }),
            }
        }
        other => SchedulerReply::Other {
            subcmd: other,
            data: body.to_vec(),
        },
    }
}

/// Builds `CREATE`: reserve `reserve_len` bytes of storage for task `task_id`.
#[must_use]
pub fn create(task_id: u8, reserve_len: u16) -> Vec<u8> {
    let mut out = vec![SCHEDULER_DATA, SCHEDULER_CREATE, task_id];
    out.extend(pack7(&reserve_len.to_le_bytes()));
    out
}

#[must_use]
pub fn delete(task_id: u8) -> Vec<u8> {
    vec![SCHEDULER_DATA, SCHEDULER_DELETE, task_id]
}

#[must_use]
pub fn add_to(task_id: u8, messages: &[u8]) -> Vec<u8> {
    let mut out = vec![SCHEDULER_DATA, SCHEDULER_ADD_TO, task_id];
    out.extend(pack7(messages));
    out
}

#[must_use]
pub fn delay(ms: u32) -> Vec<u8> {
    let mut out = vec![SCHEDULER_DATA, SCHEDULER_DELAY];
    out.extend(pack7(&ms.to_le_bytes()));
    out
}

#[must_use]
pub fn schedule(task_id: u8, delay_ms: u32) -> Vec<u8> {
    let mut out = vec![SCHEDULER_DATA, SCHEDULER_SCHEDULE, task_id];
    out.extend(pack7(&delay_ms.to_le_bytes()));
    out
}

#[must_use]
pub fn query_all() -> Vec<u8> {
    vec![SCHEDULER_DATA, SCHEDULER_QUERY_ALL]
}

#[must_use]
pub fn query_one(task_id: u8) -> Vec<u8> {
    vec![SCHEDULER_DATA, SCHEDULER_QUERY_ONE, task_id]
}

#[must_use]
pub fn reset() -> Vec<u8> {
    vec![SCHEDULER_DATA, SCHEDULER_RESET]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_all_reply_lists_ids() {
        let payload = [SCHEDULER_DATA, SCHEDULER_QUERY_ALL_REPLY, 1, 2, 3];
        assert_eq!(
            dispatch(&payload),
            SchedulerReply::QueryAllReply {
                task_ids: vec![1, 2, 3]
            }
        );
    }

    #[test]
    fn query_one_reply_short_form_has_no_task() {
        let payload = [SCHEDULER_DATA, SCHEDULER_QUERY_ONE_REPLY, 7];
        assert_eq!(
            dispatch(&payload),
            SchedulerReply::QueryOneReply {
                task_id: 7,
                task: None
            }
        );
    }

    #[test]
    fn query_one_reply_long_form_decodes_task() {
        let mut raw = 1000u32.to_le_bytes().to_vec();
        raw.extend_from_slice(&20u16.to_le_bytes());
        raw.extend_from_slice(&5u16.to_le_bytes());
        raw.extend_from_slice(&[0xAA, 0xBB]);
        let packed = pack7(&raw);
        let mut payload = vec![SCHEDULER_DATA, SCHEDULER_QUERY_ONE_REPLY, 7];
        payload.extend(packed);

        match dispatch(&payload) {
            SchedulerReply::QueryOneReply { task_id, task } => {
                assert_eq!(task_id, 7);
                let task = task.unwrap();
                assert_eq!(task.time_ms, 1000);
                assert_eq!(task.len, 20);
                assert_eq!(task.position, 5);
                assert_eq!(task.messages, vec![0xAA, 0xBB]);
            }
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[test]
    fn create_builds_expected_prefix() {
        let bytes = create(3, 64);
        assert_eq!(&bytes[..3], &[SCHEDULER_DATA, SCHEDULER_CREATE, 3]);
    }
}
