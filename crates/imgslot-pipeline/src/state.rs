use imgslot_core::FieldValue;

/// What the field shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    Dragging,
    Uploading {
        progress: u8,
    },
    Error {
        code: &'static str,
        message: String,
    },
    HasValue(FieldValue),
}

impl PipelineState {
    pub fn is_uploading(&self) -> bool {
        matches!(self, PipelineState::Uploading { .. })
    }

    pub fn progress(&self) -> Option<u8> {
        match self {
            PipelineState::Uploading { progress } => Some(*progress),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<&FieldValue> {
        match self {
            PipelineState::HasValue(value) => Some(value),
            _ => None,
        }
    }
}

/// Transient activity layered over the stored value.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) enum Activity {
    #[default]
    None,
    Dragging,
    Uploading {
        progress: u8,
    },
    Error {
        code: &'static str,
        message: String,
    },
}

/// Activity wins over the value, so an upload over an existing image shows
/// progress rather than the old image.
pub(crate) fn derive_state(activity: &Activity, value: Option<&FieldValue>) -> PipelineState {
    match activity {
        Activity::Dragging => PipelineState::Dragging,
        Activity::Uploading { progress } => PipelineState::Uploading {
            progress: *progress,
        },
        Activity::Error { code, message } => PipelineState::Error {
            code: *code,
            message: message.clone(),
        },
        Activity::None => match value {
            Some(value) => PipelineState::HasValue(value.clone()),
            None => PipelineState::Idle,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_state() {
        let value = FieldValue::External {
            url: "https://cdn.example.com/x.png".to_string(),
        };
        assert_eq!(derive_state(&Activity::None, None), PipelineState::Idle);
        assert_eq!(
            derive_state(&Activity::None, Some(&value)),
            PipelineState::HasValue(value.clone())
        );
        assert_eq!(
            derive_state(&Activity::Uploading { progress: 40 }, Some(&value)).progress(),
            Some(40)
        );
        assert!(derive_state(&Activity::Dragging, None).value().is_none());
    }
}
