//! Streaming XPDL reader.
//!
//! Only the parts of a package the analysis needs are read: each
//! `WorkflowProcess` with its `Activity` and `Transition` elements. An
//! activity's kind comes from the first-level or nested element naming it
//! (`StartEvent`, `Implementation`, `Route`, ...), see
//! [`ActivityKind::from_xpdl`]. Namespace prefixes are ignored.

use std::path::Path;

use quick_xml::encoding::Decoder;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use tracing::{debug, info};

use crate::core::{Activity, ActivityKind, Definitions, Process, SkippedProcess, Transition};
use crate::error::IngestError;

struct ProcessDraft {
    id: String,
    name: String,
    activities: Option<Vec<Activity>>,
    transitions: Option<Vec<Transition>>,
}

struct ActivityDraft {
    id: String,
    name: String,
    kind: Option<ActivityKind>,
}

struct ParseState {
    definitions: Definitions,
    process: Option<ProcessDraft>,
    activity: Option<ActivityDraft>,
}

/// Parse an XPDL document held in memory. `document` names it in results and logs.
pub fn parse_str(document: &str, xml: &str) -> Result<Definitions, IngestError> {
    parse(document, Reader::from_str(xml))
}

/// Parse raw XPDL bytes. The encoding comes from a byte order mark or the
/// `encoding` of the XML declaration, UTF-8 otherwise.
pub fn parse_bytes(document: &str, bytes: &[u8]) -> Result<Definitions, IngestError> {
    parse(document, Reader::from_reader(bytes))
}

fn parse(document: &str, mut reader: Reader<&[u8]>) -> Result<Definitions, IngestError> {
    reader.trim_text(true);

    let mut state = ParseState {
        definitions: Definitions {
            document: document.to_string(),
            ..Definitions::default()
        },
        process: None,
        activity: None,
    };

    loop {
        let event = reader.read_event().map_err(|source| IngestError::Xml {
            source,
            position: reader.buffer_position(),
        })?;
        let position = reader.buffer_position();
        // refined once the XML declaration has been read
        let decoder = reader.decoder();

        match event {
            Event::Start(e) => state.open(&e, decoder, position)?,
            Event::Empty(e) => {
                state.open(&e, decoder, position)?;
                state.close(e.local_name().as_ref())?;
            }
            Event::End(e) => state.close(e.local_name().as_ref())?,
            Event::Eof => break,
            _ => {}
        }
    }

    state.finish_process();
    debug!(
        document,
        processes = state.definitions.processes.len(),
        skipped = state.definitions.skipped.len(),
        "read XPDL document"
    );
    Ok(state.definitions)
}

/// Read and parse an XPDL file from disk, in whatever encoding it declares
pub fn read_file(path: &Path) -> Result<Definitions, IngestError> {
    let bytes = std::fs::read(path).map_err(|source| IngestError::Io {
        source,
        path: path.to_path_buf(),
    })?;
    let document = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    parse_bytes(&document, &bytes)
}

impl ParseState {
    fn open(&mut self, e: &BytesStart<'_>, decoder: Decoder, position: usize) -> Result<(), IngestError> {
        let xml_error = |source: quick_xml::Error| IngestError::Xml { source, position };

        match e.local_name().as_ref() {
            b"Package" => {
                self.definitions.name = attribute(e, decoder, b"Name").map_err(xml_error)?;
            }
            b"WorkflowProcess" => {
                self.finish_process();
                self.process = Some(ProcessDraft {
                    id: required(e, decoder, "WorkflowProcess", "Id").map_err(xml_error)??,
                    name: attribute(e, decoder, b"Name").map_err(xml_error)?.unwrap_or_default(),
                    activities: None,
                    transitions: None,
                });
            }
            b"Activities" => {
                if let Some(process) = self.process.as_mut() {
                    process.activities.get_or_insert_with(Vec::new);
                }
            }
            b"Transitions" => {
                if let Some(process) = self.process.as_mut() {
                    process.transitions.get_or_insert_with(Vec::new);
                }
            }
            b"Activity" => {
                if self.process.is_none() {
                    return Err(IngestError::Orphan { element: "Activity" });
                }
                self.activity = Some(ActivityDraft {
                    id: required(e, decoder, "Activity", "Id").map_err(xml_error)??,
                    name: attribute(e, decoder, b"Name").map_err(xml_error)?.unwrap_or_default(),
                    kind: None,
                });
            }
            b"Transition" => {
                let Some(process) = self.process.as_mut() else {
                    return Err(IngestError::Orphan { element: "Transition" });
                };
                let transition = Transition {
                    id: required(e, decoder, "Transition", "Id").map_err(xml_error)??,
                    from_id: required(e, decoder, "Transition", "From").map_err(xml_error)??,
                    to_id: required(e, decoder, "Transition", "To").map_err(xml_error)??,
                };
                process.transitions.get_or_insert_with(Vec::new).push(transition);
            }
            other => {
                if let Some(activity) = self.activity.as_mut() {
                    let kind = std::str::from_utf8(other).ok().and_then(ActivityKind::from_xpdl);
                    if let Some(kind) = kind {
                        activity.kind = Some(kind);
                    }
                }
            }
        }
        Ok(())
    }

    fn close(&mut self, local_name: &[u8]) -> Result<(), IngestError> {
        match local_name {
            b"Activity" => {
                let (Some(draft), Some(process)) = (self.activity.take(), self.process.as_mut()) else {
                    return Ok(());
                };
                let Some(kind) = draft.kind else {
                    return Err(IngestError::UnknownKind {
                        process: process.id.clone(),
                        activity: draft.id,
                    });
                };
                process
                    .activities
                    .get_or_insert_with(Vec::new)
                    .push(Activity::new(draft.id, draft.name, kind));
            }
            b"WorkflowProcess" => self.finish_process(),
            _ => {}
        }
        Ok(())
    }

    /// Move the open process into the definitions, or into the skipped list
    /// when it lacks a list of activities or transitions.
    fn finish_process(&mut self) {
        let Some(draft) = self.process.take() else {
            return;
        };

        let reason = match (&draft.activities, &draft.transitions) {
            (None, _) => Some("no activities declared"),
            (_, None) => Some("no transitions declared"),
            _ => None,
        };

        match (reason, draft.activities, draft.transitions) {
            (None, Some(activities), Some(transitions)) => {
                self.definitions.processes.push(Process {
                    id: draft.id,
                    name: draft.name,
                    activities,
                    transitions,
                });
            }
            (reason, _, _) => {
                let reason = reason.unwrap_or("incomplete process").to_string();
                info!(process = %draft.id, %reason, "skipping process that cannot be analyzed");
                self.definitions.skipped.push(SkippedProcess {
                    id: draft.id,
                    name: draft.name,
                    reason,
                });
            }
        }
    }
}

fn attribute(e: &BytesStart<'_>, decoder: Decoder, key: &[u8]) -> quick_xml::Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == key {
            let raw = decoder.decode(&attr.value)?;
            return Ok(Some(unescape(&raw)?.into_owned()));
        }
    }
    Ok(None)
}

/// Outer result carries XML errors, inner one the missing attribute
fn required(
    e: &BytesStart<'_>,
    decoder: Decoder,
    element: &'static str,
    attribute_name: &'static str,
) -> quick_xml::Result<Result<String, IngestError>> {
    Ok(attribute(e, decoder, attribute_name.as_bytes())?.ok_or(IngestError::MissingAttribute {
        element,
        attribute: attribute_name,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Package xmlns="http://www.wfmc.org/2008/XPDL2.1" Id="pkg" Name="Orders">
  <WorkflowProcesses>
    <WorkflowProcess Id="wp1" Name="Order handling">
      <Activities>
        <Activity Id="a1" Name="Order received">
          <Event><StartEvent Trigger="None"/></Event>
          <NodeGraphicsInfos><NodeGraphicsInfo Width="30" Height="30"/></NodeGraphicsInfos>
        </Activity>
        <Activity Id="a2" Name="Check stock">
          <Implementation><Task/></Implementation>
        </Activity>
        <Activity Id="a3">
          <Route GatewayType="Exclusive"/>
        </Activity>
        <Activity Id="a4" Name="Done">
          <Event><EndEvent/></Event>
        </Activity>
      </Activities>
      <Transitions>
        <Transition Id="t1" From="a1" To="a2"/>
        <Transition Id="t2" From="a2" To="a3"/>
        <Transition Id="t3" From="a3" To="a4"/>
      </Transitions>
    </WorkflowProcess>
    <WorkflowProcess Id="wp2" Name="Pool only"/>
  </WorkflowProcesses>
</Package>"#;

    #[test]
    fn reads_processes_activities_and_transitions() {
        let defs = parse_str("orders.xpdl", ORDER).unwrap();
        assert_eq!(defs.document, "orders.xpdl");
        assert_eq!(defs.name.as_deref(), Some("Orders"));
        assert_eq!(defs.processes.len(), 1);

        let process = &defs.processes[0];
        assert_eq!(process.id, "wp1");
        assert_eq!(process.name, "Order handling");
        let kinds: Vec<ActivityKind> = process.activities.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ActivityKind::StartEvent,
                ActivityKind::Task,
                ActivityKind::Gateway,
                ActivityKind::EndEvent
            ]
        );
        assert_eq!(process.activities[2].name, "");
        assert_eq!(process.transitions.len(), 3);
        assert_eq!(process.transitions[1], Transition::new("t2", "a2", "a3"));
    }

    #[test]
    fn processes_without_lists_are_skipped() {
        let defs = parse_str("orders.xpdl", ORDER).unwrap();
        assert_eq!(defs.skipped.len(), 1);
        assert_eq!(defs.skipped[0].id, "wp2");
        assert_eq!(defs.skipped[0].reason, "no activities declared");
    }

    #[test]
    fn process_without_transitions_is_skipped() {
        let xml = r#"<Package><WorkflowProcesses>
            <WorkflowProcess Id="p" Name="Half">
              <Activities><Activity Id="a"><Event><StartEvent/></Event></Activity></Activities>
            </WorkflowProcess>
        </WorkflowProcesses></Package>"#;
        let defs = parse_str("half.xpdl", xml).unwrap();
        assert!(defs.processes.is_empty());
        assert_eq!(defs.skipped[0].reason, "no transitions declared");
    }

    #[test]
    fn empty_lists_are_still_analyzable() {
        let xml = r#"<Package><WorkflowProcess Id="p"><Activities/><Transitions/></WorkflowProcess></Package>"#;
        let defs = parse_str("empty.xpdl", xml).unwrap();
        assert_eq!(defs.processes.len(), 1);
        assert!(defs.processes[0].activities.is_empty());
    }

    #[test]
    fn untyped_activity_is_an_error() {
        let xml = r#"<Package><WorkflowProcess Id="p"><Activities>
            <Activity Id="x" Name="Mystery"><Description>?</Description></Activity>
        </Activities><Transitions/></WorkflowProcess></Package>"#;
        let err = parse_str("bad.xpdl", xml).unwrap_err();
        assert!(matches!(
            err,
            IngestError::UnknownKind { ref process, ref activity } if process == "p" && activity == "x"
        ));
    }

    #[test]
    fn activity_outside_process_is_an_error() {
        let xml = r#"<Package><Activity Id="x"/></Package>"#;
        assert!(matches!(
            parse_str("bad.xpdl", xml),
            Err(IngestError::Orphan { element: "Activity" })
        ));
    }

    #[test]
    fn transition_requires_endpoints() {
        let xml = r#"<Package><WorkflowProcess Id="p"><Transitions>
            <Transition Id="t" From="a"/>
        </Transitions></WorkflowProcess></Package>"#;
        assert!(matches!(
            parse_str("bad.xpdl", xml),
            Err(IngestError::MissingAttribute { element: "Transition", attribute: "To" })
        ));
    }

    #[test]
    fn prefixed_elements_are_matched_by_local_name() {
        let xml = r#"<xpdl:Package xmlns:xpdl="http://www.wfmc.org/2008/XPDL2.1">
            <xpdl:WorkflowProcess Id="p" Name="Prefixed">
              <xpdl:Activities>
                <xpdl:Activity Id="s"><xpdl:Event><xpdl:StartEvent/></xpdl:Event></xpdl:Activity>
              </xpdl:Activities>
              <xpdl:Transitions/>
            </xpdl:WorkflowProcess>
        </xpdl:Package>"#;
        let defs = parse_str("prefixed.xpdl", xml).unwrap();
        assert_eq!(defs.processes[0].activities[0].kind, ActivityKind::StartEvent);
    }

    #[test]
    fn malformed_xml_reports_position() {
        let xml = r#"<Package><WorkflowProcess Id="p"></Package>"#;
        assert!(matches!(parse_str("bad.xpdl", xml), Err(IngestError::Xml { .. })));
    }

    #[test]
    fn declared_single_byte_encoding_is_decoded() {
        // "Заказ" in windows-1251
        let name: &[u8] = &[0xC7, 0xE0, 0xEA, 0xE0, 0xE7];
        let mut bytes = br#"<?xml version="1.0" encoding="windows-1251"?>
<Package><WorkflowProcess Id="p" Name=""#
            .to_vec();
        bytes.extend_from_slice(name);
        bytes.extend_from_slice(
            br#""><Activities><Activity Id="s" Name=""#,
        );
        bytes.extend_from_slice(name);
        bytes.extend_from_slice(
            br#""><Event><StartEvent/></Event></Activity></Activities><Transitions/></WorkflowProcess></Package>"#,
        );

        let defs = parse_bytes("cp1251.xpdl", &bytes).unwrap();
        assert_eq!(defs.processes[0].name, "Заказ");
        assert_eq!(defs.processes[0].activities[0].name, "Заказ");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cp1251.xpdl");
        std::fs::write(&path, &bytes).unwrap();
        let defs = read_file(&path).unwrap();
        assert_eq!(defs.document, "cp1251.xpdl");
        assert_eq!(defs.processes[0].name, "Заказ");
    }
}
