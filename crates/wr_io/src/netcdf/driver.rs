// crates/wr_io/src/netcdf/driver.rs

//! NetCDF 驱动实现

use super::error::NetCdfError;
use std::path::Path;

/// 维度信息
#[derive(Debug, Clone)]
pub struct Dimension {
    /// 名称
    pub name: String,
    /// 长度
    pub len: usize,
}

/// 变量数据（按文件中的维度顺序，行优先）
#[derive(Debug, Clone)]
pub struct Variable {
    /// 变量名
    pub name: String,
    /// 数据
    pub data: Vec<f64>,
    /// 维度大小
    pub dims: Vec<usize>,
}

impl Variable {
    /// 创建变量
    pub fn new(name: impl Into<String>, data: Vec<f64>, dims: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            data,
            dims,
        }
    }

    /// 计算线性索引
    fn linear_index(&self, indices: &[usize]) -> Option<usize> {
        if indices.len() != self.dims.len() {
            return None;
        }

        let mut idx = 0;
        let mut stride = 1;
        for (i, &dim_size) in self.dims.iter().enumerate().rev() {
            if indices[i] >= dim_size {
                return None;
            }
            idx += indices[i] * stride;
            stride *= dim_size;
        }
        Some(idx)
    }

    /// 获取指定索引的值
    pub fn get(&self, indices: &[usize]) -> Option<f64> {
        let idx = self.linear_index(indices)?;
        self.data.get(idx).copied()
    }

    /// 获取总元素数
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 非单位长度维度的个数
    pub fn effective_rank(&self) -> usize {
        self.dims.iter().filter(|&&d| d > 1).count()
    }

    /// 把填充值替换为 NaN
    pub fn mask_fill_value(&mut self, fill: f64) {
        for v in &mut self.data {
            if *v == fill {
                *v = f64::NAN;
            }
        }
    }
}

/// NetCDF 驱动
#[cfg(feature = "netcdf")]
pub struct NetCdfDriver {
    file: ::netcdf::File,
}

#[cfg(feature = "netcdf")]
fn attr_as_f64(value: ::netcdf::AttributeValue) -> Option<f64> {
    use ::netcdf::AttributeValue as A;
    match value {
        A::Double(v) => Some(v),
        A::Float(v) => Some(f64::from(v)),
        A::Int(v) => Some(f64::from(v)),
        A::Short(v) => Some(f64::from(v)),
        A::Doubles(v) => v.first().copied(),
        A::Floats(v) => v.first().map(|&x| f64::from(x)),
        _ => None,
    }
}

#[cfg(feature = "netcdf")]
impl NetCdfDriver {
    /// 打开 NetCDF 文件
    pub fn open(path: impl AsRef<Path>) -> Result<Self, NetCdfError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(NetCdfError::FileNotFound(path.display().to_string()));
        }

        let file = ::netcdf::open(path)?;
        Ok(Self { file })
    }

    /// 获取维度
    pub fn dimension(&self, name: &str) -> Result<Dimension, NetCdfError> {
        let d = self
            .file
            .dimension(name)
            .ok_or_else(|| NetCdfError::DimensionNotFound(name.to_string()))?;
        Ok(Dimension {
            name: d.name().to_string(),
            len: d.len(),
        })
    }

    /// 变量名列表
    pub fn variable_names(&self) -> Vec<String> {
        self.file.variables().map(|v| v.name().to_string()).collect()
    }

    /// 读取变量，应用 `scale_factor` / `add_offset`，填充值替换为 NaN
    pub fn read_variable(&self, name: &str) -> Result<Variable, NetCdfError> {
        let var = self
            .file
            .variable(name)
            .ok_or_else(|| NetCdfError::VariableNotFound(name.to_string()))?;

        let dims: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
        let raw: Vec<f64> = var
            .get_values::<f64, _>(..)
            .map_err(|e| NetCdfError::ReadFailed(format!("{name}: {e}")))?;

        let numeric = |attr: &str| {
            var.attribute(attr)
                .and_then(|a| a.value().ok())
                .and_then(attr_as_f64)
        };
        let fill = numeric("_FillValue").or_else(|| numeric("missing_value"));
        let scale = numeric("scale_factor").unwrap_or(1.0);
        let offset = numeric("add_offset").unwrap_or(0.0);

        let mut variable = Variable::new(name, raw, dims);
        if let Some(fill) = fill {
            variable.mask_fill_value(fill);
        }
        if scale != 1.0 || offset != 0.0 {
            for v in &mut variable.data {
                *v = *v * scale + offset;
            }
        }
        Ok(variable)
    }

    /// 读取变量的字符串属性
    pub fn attribute_string(&self, variable: &str, attr: &str) -> Result<String, NetCdfError> {
        let var = self
            .file
            .variable(variable)
            .ok_or_else(|| NetCdfError::VariableNotFound(variable.to_string()))?;
        let value = var
            .attribute(attr)
            .ok_or_else(|| NetCdfError::AttributeNotFound(format!("{variable}:{attr}")))?
            .value()?;

        match value {
            ::netcdf::AttributeValue::Str(s) => Ok(s),
            other => Ok(format!("{:?}", other)),
        }
    }
}

/// 无 NetCDF 支持时的占位实现
#[cfg(not(feature = "netcdf"))]
pub struct NetCdfDriver;

#[cfg(not(feature = "netcdf"))]
impl NetCdfDriver {
    /// 打开 NetCDF 文件 (无 NetCDF 支持)
    pub fn open(_path: impl AsRef<Path>) -> Result<Self, NetCdfError> {
        Err(NetCdfError::NotAvailable)
    }

    /// 获取维度 (无 NetCDF 支持)
    pub fn dimension(&self, _name: &str) -> Result<Dimension, NetCdfError> {
        Err(NetCdfError::NotAvailable)
    }

    /// 变量名列表 (无 NetCDF 支持)
    pub fn variable_names(&self) -> Vec<String> {
        Vec::new()
    }

    /// 读取变量 (无 NetCDF 支持)
    pub fn read_variable(&self, _name: &str) -> Result<Variable, NetCdfError> {
        Err(NetCdfError::NotAvailable)
    }

    /// 读取变量的字符串属性 (无 NetCDF 支持)
    pub fn attribute_string(&self, _variable: &str, _attr: &str) -> Result<String, NetCdfError> {
        Err(NetCdfError::NotAvailable)
    }
}
