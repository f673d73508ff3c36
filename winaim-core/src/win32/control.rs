//! Exact-match control resolution inside one window.
//!
//! The query goes through UIA's own matcher: a `FindAll` over the
//! window's descendants with a Name AND ControlType property condition.
//! Letting UIA filter server-side avoids marshalling the whole subtree
//! just to inspect two properties per element.

use windows::core::{BSTR, VARIANT};
use windows::Win32::Foundation::HWND;
use windows::Win32::System::Com::{CoCreateInstance, CLSCTX_INPROC_SERVER};
use windows::Win32::UI::Accessibility::{
    CUIAutomation, IUIAutomation, IUIAutomationCondition, IUIAutomationElement,
    TreeScope_Descendants, UIA_ControlTypePropertyId, UIA_NamePropertyId,
};

use super::com::ComGuard;
use crate::errors::WinaimError;
use crate::geom::Rect;
use crate::provider::{ControlLookup, ControlQuery};

/// Map a control type name (e.g. "Button") to its `UIA_*ControlTypeId`
/// integer.  Returns `None` for unrecognised names.
fn control_type_id(name: &str) -> Option<i32> {
    use windows::Win32::UI::Accessibility::*;
    match name {
        "AppBar" => Some(UIA_AppBarControlTypeId.0),
        "Button" => Some(UIA_ButtonControlTypeId.0),
        "Calendar" => Some(UIA_CalendarControlTypeId.0),
        "CheckBox" => Some(UIA_CheckBoxControlTypeId.0),
        "ComboBox" => Some(UIA_ComboBoxControlTypeId.0),
        "Custom" => Some(UIA_CustomControlTypeId.0),
        "DataGrid" => Some(UIA_DataGridControlTypeId.0),
        "DataItem" => Some(UIA_DataItemControlTypeId.0),
        "Document" => Some(UIA_DocumentControlTypeId.0),
        "Edit" => Some(UIA_EditControlTypeId.0),
        "Group" => Some(UIA_GroupControlTypeId.0),
        "Header" => Some(UIA_HeaderControlTypeId.0),
        "HeaderItem" => Some(UIA_HeaderItemControlTypeId.0),
        "Hyperlink" => Some(UIA_HyperlinkControlTypeId.0),
        "Image" => Some(UIA_ImageControlTypeId.0),
        "List" => Some(UIA_ListControlTypeId.0),
        "ListItem" => Some(UIA_ListItemControlTypeId.0),
        "MenuBar" => Some(UIA_MenuBarControlTypeId.0),
        "Menu" => Some(UIA_MenuControlTypeId.0),
        "MenuItem" => Some(UIA_MenuItemControlTypeId.0),
        "Pane" => Some(UIA_PaneControlTypeId.0),
        "ProgressBar" => Some(UIA_ProgressBarControlTypeId.0),
        "RadioButton" => Some(UIA_RadioButtonControlTypeId.0),
        "ScrollBar" => Some(UIA_ScrollBarControlTypeId.0),
        "SemanticZoom" => Some(UIA_SemanticZoomControlTypeId.0),
        "Separator" => Some(UIA_SeparatorControlTypeId.0),
        "Slider" => Some(UIA_SliderControlTypeId.0),
        "Spinner" => Some(UIA_SpinnerControlTypeId.0),
        "SplitButton" => Some(UIA_SplitButtonControlTypeId.0),
        "StatusBar" => Some(UIA_StatusBarControlTypeId.0),
        "Tab" => Some(UIA_TabControlTypeId.0),
        "TabItem" => Some(UIA_TabItemControlTypeId.0),
        "Table" => Some(UIA_TableControlTypeId.0),
        "Text" => Some(UIA_TextControlTypeId.0),
        "Thumb" => Some(UIA_ThumbControlTypeId.0),
        "TitleBar" => Some(UIA_TitleBarControlTypeId.0),
        "ToolBar" => Some(UIA_ToolBarControlTypeId.0),
        "ToolTip" => Some(UIA_ToolTipControlTypeId.0),
        "Tree" => Some(UIA_TreeControlTypeId.0),
        "TreeItem" => Some(UIA_TreeItemControlTypeId.0),
        "Window" => Some(UIA_WindowControlTypeId.0),
        _ => None,
    }
}

/// Exact Name AND ControlType condition.
unsafe fn exact_match_condition(
    uia: &IUIAutomation,
    title: &str,
    type_id: i32,
) -> Result<IUIAutomationCondition, WinaimError> {
    let name = VARIANT::from(BSTR::from(title));
    let name_condition = uia
        .CreatePropertyCondition(UIA_NamePropertyId, &name)
        .map_err(|e| WinaimError::TreeError(format!("CreatePropertyCondition(Name): {e}")))?;

    let control_type = VARIANT::from(type_id);
    let type_condition = uia
        .CreatePropertyCondition(UIA_ControlTypePropertyId, &control_type)
        .map_err(|e| WinaimError::TreeError(format!("CreatePropertyCondition(ControlType): {e}")))?;

    uia.CreateAndCondition(&name_condition, &type_condition)
        .map_err(|e| WinaimError::TreeError(format!("CreateAndCondition: {e}")))
}

/// Resolve `query` inside the window behind `handle`.
///
/// An unrecognised control type tag cannot match anything and resolves to
/// `NotFound` without touching COM.  A match whose rectangle cannot be
/// read anymore resolves to `Stale` so the caller can report it instead
/// of clicking a phantom.
pub fn resolve(handle: isize, query: &ControlQuery) -> Result<ControlLookup, WinaimError> {
    let Some(type_id) = control_type_id(&query.control_type) else {
        tracing::debug!(control_type = %query.control_type, "unrecognised control type tag");
        return Ok(ControlLookup::NotFound);
    };

    let _com = ComGuard::init()?;

    let uia: IUIAutomation = unsafe { CoCreateInstance(&CUIAutomation, None, CLSCTX_INPROC_SERVER)? };

    let root: IUIAutomationElement = unsafe {
        uia.ElementFromHandle(HWND(handle as *mut core::ffi::c_void))
            .map_err(|e| WinaimError::TreeError(format!("ElementFromHandle({handle}): {e}")))?
    };

    let condition = unsafe { exact_match_condition(&uia, &query.title, type_id)? };

    let matches = unsafe {
        root.FindAll(TreeScope_Descendants, &condition)
            .map_err(|e| WinaimError::TreeError(format!("FindAll: {e}")))?
    };

    let count = unsafe { matches.Length() }.unwrap_or(0);
    if count == 0 {
        return Ok(ControlLookup::NotFound);
    }

    let element = unsafe { matches.GetElement(0) }
        .map_err(|e| WinaimError::TreeError(format!("GetElement(0): {e}")))?;

    match unsafe { element.CurrentBoundingRectangle() } {
        Ok(r) => Ok(ControlLookup::Found(Rect::new(r.left, r.top, r.right, r.bottom))),
        Err(e) => Ok(ControlLookup::Stale(format!(
            "control '{}' found but its rectangle could not be read: {e}",
            query.title
        ))),
    }
}
